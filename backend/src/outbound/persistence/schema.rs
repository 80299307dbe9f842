//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is stored lower-cased and is unique.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Course catalog, listed in id order.
    courses (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        instructor -> Varchar,
        duration -> Varchar,
        level -> Varchar,
        image -> Text,
    }
}

diesel::table! {
    /// Append-only enrollment records.
    ///
    /// `(user_id, idempotency_key)` is unique when the key is present.
    enrollments (id) {
        id -> Uuid,
        full_name -> Varchar,
        email -> Varchar,
        course_id -> Int4,
        user_id -> Uuid,
        idempotency_key -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(enrollments -> courses (course_id));
diesel::joinable!(enrollments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(courses, enrollments, users);
