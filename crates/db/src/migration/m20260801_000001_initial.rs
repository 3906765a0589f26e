//! Initial schema migration.
//!
//! Creates users, businesses (with member/category/payment-mode tables),
//! books (with member table), entries, activity logs, notifications, and
//! the trash snapshot store.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS trash CASCADE;
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS activity_logs CASCADE;
DROP TABLE IF EXISTS entries CASCADE;
DROP TABLE IF EXISTS book_members CASCADE;
DROP TABLE IF EXISTS books CASCADE;
DROP TABLE IF EXISTS payment_modes CASCADE;
DROP TABLE IF EXISTS business_categories CASCADE;
DROP TABLE IF EXISTS business_members CASCADE;
DROP TABLE IF EXISTS businesses CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TYPE IF EXISTS trash_kind;
DROP TYPE IF EXISTS category_kind;
DROP TYPE IF EXISTS entry_kind;
DROP TYPE IF EXISTS member_role;
",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Enum types
CREATE TYPE member_role AS ENUM ('admin', 'editor', 'member');
CREATE TYPE entry_kind AS ENUM ('IN', 'OUT');
CREATE TYPE category_kind AS ENUM ('IN', 'OUT', 'BOTH');
CREATE TYPE trash_kind AS ENUM ('business', 'book', 'entry', 'activity_log');

-- Users synced from the identity provider
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    external_ref VARCHAR(128) NOT NULL UNIQUE,
    email VARCHAR(255) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    photo_url TEXT,
    phone_number VARCHAR(32),
    address TEXT,
    social_link TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Businesses: top-level tenants
-- owner_id is a soft reference: author-style columns are not enforced so
-- audit rows and snapshots can outlive their users.
CREATE TABLE businesses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    owner_id UUID NOT NULL,
    address TEXT,
    business_category VARCHAR(255),
    phone VARCHAR(32),
    description TEXT,
    image_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_businesses_owner ON businesses(owner_id);

CREATE TABLE business_members (
    business_id UUID NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role member_role NOT NULL DEFAULT 'member',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (business_id, user_id)
);

CREATE INDEX idx_business_members_user ON business_members(user_id);

CREATE TABLE business_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    business_id UUID NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    kind category_kind NOT NULL DEFAULT 'BOTH',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Duplicate categories are rejected case-insensitively
CREATE UNIQUE INDEX idx_business_categories_name
    ON business_categories(business_id, lower(name));

CREATE TABLE payment_modes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    business_id UUID NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, name)
);

-- Books: named ledgers with a running balance
CREATE TABLE books (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    business_id UUID NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_by UUID NOT NULL,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_books_business ON books(business_id, created_at DESC);

CREATE TABLE book_members (
    book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role member_role NOT NULL DEFAULT 'member',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (book_id, user_id)
);

-- Entries: income/expense transactions
-- transaction_id is intentionally NOT unique: best-effort identifiers
CREATE TABLE entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    transaction_id VARCHAR(14) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    entry_type entry_kind NOT NULL,
    entry_date DATE NOT NULL,
    remark TEXT,
    category VARCHAR(255) NOT NULL,
    payment_mode VARCHAR(255) NOT NULL DEFAULT 'Cash',
    receipt_url TEXT,
    created_by UUID NOT NULL,
    updated_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_entries_book_date ON entries(book_id, entry_date DESC, created_at DESC);

-- Append-only audit trail
CREATE TABLE activity_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    business_id UUID NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
    book_id UUID,
    entry_id UUID,
    user_id UUID NOT NULL,
    action VARCHAR(64) NOT NULL,
    details TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_activity_logs_business ON activity_logs(business_id, created_at DESC);

-- Pull-polled notifications
CREATE TABLE notifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    sender_id UUID,
    business_id UUID,
    book_id UUID,
    message TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_notifications_user ON notifications(user_id, created_at DESC);
CREATE INDEX idx_notifications_unread ON notifications(user_id) WHERE NOT is_read;

-- Soft-delete snapshot store
-- Typed parent columns drive cascade traversal; no FKs since the
-- referenced rows are gone while a snapshot exists.
CREATE TABLE trash (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind trash_kind NOT NULL,
    original_id UUID NOT NULL,
    data JSONB NOT NULL,
    parent_business_id UUID,
    parent_book_id UUID,
    deleted_by UUID NOT NULL,
    deleted_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_trash_deleter ON trash(deleted_by, deleted_at DESC);
CREATE INDEX idx_trash_parent_business ON trash(parent_business_id) WHERE parent_business_id IS NOT NULL;
CREATE INDEX idx_trash_parent_book ON trash(parent_book_id) WHERE parent_book_id IS NOT NULL;
";
