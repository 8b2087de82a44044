// Mirrors the Prisma data model of the OTC advisor application.
// Shared by the SQLite origin and the PostgreSQL target.

diesel::table! {
    users (id) {
        id -> Text,
        email -> Text,
        name -> Nullable<Text>,
        role -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    user_profiles (id) {
        id -> Text,
        user_id -> Text,
        birth_date -> Nullable<Text>,
        weight_kg -> Nullable<Double>,
        is_pregnant -> Bool,
        allergies -> Nullable<Text>,
        conditions -> Nullable<Text>,
        updated_at -> Text,
    }
}

diesel::table! {
    drugs (id) {
        id -> Text,
        name -> Text,
        generic_name -> Text,
        category -> Text,
        dosage_form -> Text,
        strength_mg -> Nullable<Double>,
        max_daily_dose_mg -> Nullable<Double>,
        min_age_years -> Nullable<Integer>,
        warnings -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    symptom_histories (id) {
        id -> Text,
        user_id -> Text,
        symptoms -> Text,
        severity -> Text,
        recommendation -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    dose_calculations (id) {
        id -> Text,
        user_id -> Text,
        drug_id -> Text,
        age_years -> Integer,
        weight_kg -> Nullable<Double>,
        dose_mg -> Double,
        frequency -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    reminders (id) {
        id -> Text,
        user_id -> Text,
        drug_id -> Text,
        dose_label -> Text,
        schedule -> Text,
        is_active -> Bool,
        next_fire_at -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    educational_contents (id) {
        id -> Text,
        slug -> Text,
        title -> Text,
        category -> Text,
        body -> Text,
        published -> Bool,
        created_at -> Text,
    }
}

diesel::table! {
    faqs (id) {
        id -> Text,
        question -> Text,
        answer -> Text,
        category -> Text,
        sort_order -> Integer,
        created_at -> Text,
    }
}

diesel::joinable!(user_profiles -> users (user_id));
diesel::joinable!(symptom_histories -> users (user_id));
diesel::joinable!(dose_calculations -> users (user_id));
diesel::joinable!(dose_calculations -> drugs (drug_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_profiles,
    drugs,
    symptom_histories,
    dose_calculations,
    reminders,
    educational_contents,
    faqs,
);
