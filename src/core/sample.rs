/// Built-in candidate profiles for the swipe screen

use crate::core::models::{Gender, ModerationStatus, Profile};

/// The fixed three-profile candidate list. Always approved, never persisted.
pub fn sample_profiles() -> Vec<Profile> {
    vec![
        Profile {
            id: 1,
            name: "Алексей".to_string(),
            age: 16,
            city: "Москва".to_string(),
            gender: Gender::Male,
            photo: "https://api.dicebear.com/7.x/avataaars/svg?seed=Alex".to_string(),
            status: ModerationStatus::Approved,
            bio: Some("Into programming and music".to_string()),
        },
        Profile {
            id: 2,
            name: "Мария".to_string(),
            age: 15,
            city: "Санкт-Петербург".to_string(),
            gender: Gender::Female,
            photo: "https://api.dicebear.com/7.x/avataaars/svg?seed=Maria".to_string(),
            status: ModerationStatus::Approved,
            bio: Some("Love drawing and travelling".to_string()),
        },
        Profile {
            id: 3,
            name: "Дмитрий".to_string(),
            age: 17,
            city: "Казань".to_string(),
            gender: Gender::Male,
            photo: "https://api.dicebear.com/7.x/avataaars/svg?seed=Dmitry".to_string(),
            status: ModerationStatus::Approved,
            bio: Some("Sports and photography".to_string()),
        },
    ]
}
