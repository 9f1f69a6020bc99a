//! Trainer roster shown on the admin dashboard
//!
//! Read-only and not persisted.

use fitpulse_shared::Trainer;

fn trainer(id: &str, name: &str, specialty: &str, students: u32, rating: f32, img: &str) -> Trainer {
    Trainer {
        id: id.to_string(),
        name: name.to_string(),
        specialty: specialty.to_string(),
        students,
        rating,
        img: img.to_string(),
        email: Some(format!("{}@fitpulse.com", id)),
        phone: None,
    }
}

/// Trainers on staff
pub fn default_roster() -> Vec<Trainer> {
    vec![
        trainer(
            "t_ahmet",
            "Ahmet Yılmaz",
            "Vücut Geliştirme",
            24,
            4.8,
            "https://i.pravatar.cc/150?u=t_ahmet",
        ),
        trainer(
            "t_elif",
            "Elif Demir",
            "Pilates & Yoga",
            31,
            4.9,
            "https://i.pravatar.cc/150?u=t_elif",
        ),
        trainer(
            "t_burak",
            "Burak Kaya",
            "Fonksiyonel Antrenman",
            18,
            4.6,
            "https://i.pravatar.cc/150?u=t_burak",
        ),
    ]
}
