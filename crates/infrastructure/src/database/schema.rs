// Database schema for the donor registry
diesel::table! {
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,             // Unique
        password_hash -> Text,     // Argon2 PHC string
    }
}

diesel::table! {
    donors (user_id) {
        user_id -> Integer,
        blood_type -> Text,        // Label, e.g. "AB-"
        dob -> Date,
        gender -> Integer,         // 1 male, 2 female, 3 other
        phone -> Text,
    }
}

diesel::table! {
    receivers (user_id) {
        user_id -> Integer,
        required_blood_type -> Text,
        phone -> Text,
    }
}

diesel::table! {
    emergency_contacts (id) {
        id -> Integer,
        user_id -> Integer,
        name -> Text,
        phone -> Text,
        email -> Text,
        relation -> Text,
    }
}

diesel::joinable!(donors -> users (user_id));
diesel::joinable!(receivers -> users (user_id));
diesel::joinable!(emergency_contacts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, donors, receivers, emergency_contacts,);
