//! Diesel table definitions mirroring the SQL migrations.

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        username -> Text,
        password_hash -> Text,
        role -> Text,
        promoted -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    questions (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Text,
        body -> Text,
        tags -> Array<Text>,
        score -> Int8,
        votes -> Jsonb,
        favorites -> Array<Uuid>,
        answers -> Jsonb,
        views -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(questions -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, questions);
