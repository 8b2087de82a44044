//! Table definitions for `--init-schema`.
//!
//! Kept in step with `crate::schema`. Foreign keys mirror the Prisma
//! relations; a row whose parent is missing fails its batch.

pub const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    role TEXT NOT NULL DEFAULT 'USER',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_profiles (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    birth_date TEXT,
    weight_kg DOUBLE PRECISION,
    is_pregnant BOOLEAN NOT NULL DEFAULT FALSE,
    allergies TEXT,
    conditions TEXT,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    generic_name TEXT NOT NULL,
    category TEXT NOT NULL,
    dosage_form TEXT NOT NULL,
    strength_mg DOUBLE PRECISION,
    max_daily_dose_mg DOUBLE PRECISION,
    min_age_years INTEGER,
    warnings TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS symptom_histories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    symptoms TEXT NOT NULL,
    severity TEXT NOT NULL,
    recommendation TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dose_calculations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    drug_id TEXT NOT NULL REFERENCES drugs(id),
    age_years INTEGER NOT NULL,
    weight_kg DOUBLE PRECISION,
    dose_mg DOUBLE PRECISION NOT NULL,
    frequency TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    drug_id TEXT NOT NULL REFERENCES drugs(id),
    dose_label TEXT NOT NULL,
    schedule TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    next_fire_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS educational_contents (
    id TEXT PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    body TEXT NOT NULL,
    published BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS faqs (
    id TEXT PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    category TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_symptom_histories_user ON symptom_histories(user_id);
CREATE INDEX IF NOT EXISTS idx_dose_calculations_user ON dose_calculations(user_id);
CREATE INDEX IF NOT EXISTS idx_reminders_user ON reminders(user_id);
"#;

pub const SQLITE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    role TEXT NOT NULL DEFAULT 'USER',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_profiles (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    birth_date TEXT,
    weight_kg REAL,
    is_pregnant BOOLEAN NOT NULL DEFAULT 0,
    allergies TEXT,
    conditions TEXT,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    generic_name TEXT NOT NULL,
    category TEXT NOT NULL,
    dosage_form TEXT NOT NULL,
    strength_mg REAL,
    max_daily_dose_mg REAL,
    min_age_years INTEGER,
    warnings TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS symptom_histories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    symptoms TEXT NOT NULL,
    severity TEXT NOT NULL,
    recommendation TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dose_calculations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    drug_id TEXT NOT NULL REFERENCES drugs(id),
    age_years INTEGER NOT NULL,
    weight_kg REAL,
    dose_mg REAL NOT NULL,
    frequency TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    drug_id TEXT NOT NULL REFERENCES drugs(id),
    dose_label TEXT NOT NULL,
    schedule TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    next_fire_at TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS educational_contents (
    id TEXT PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    body TEXT NOT NULL,
    published BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS faqs (
    id TEXT PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    category TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
"#;
