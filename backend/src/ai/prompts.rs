//! Prompt text sent to the generator
//!
//! Instructions are in Turkish, matching the language of the app.

use fitpulse_shared::ai_payload::{PLAN_BLOCK_END, PLAN_BLOCK_START};
use fitpulse_shared::types::{ChatMessage, ChatRole};
use fitpulse_shared::{FoodItem, User};
use std::fmt::Write;

const UNSPECIFIED: &str = "Belirtilmemiş";

const PLAN_SCHEMA: &str = r#"{
  "title": "Program başlığı (örn: Hipertrofi Başlangıç A)",
  "focus": "Odak bölgesi (örn: Tüm Vücut)",
  "difficulty": "Başlangıç" | "Orta" | "İleri",
  "exercises": [
    { "name": "Hareket adı", "sets": "3", "reps": "12", "rest": "60 sn" }
  ]
}"#;

fn or_unspecified(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(UNSPECIFIED)
}

/// One-day workout plan for a member profile
pub fn workout_plan(user: &User) -> String {
    format!(
        "Profesyonel bir kişisel antrenör olarak aşağıdaki üye için tek günlük, \
kişiye özel bir antrenman programı hazırla.\n\n\
Üye profili:\n\
- Yaş: {age}\n\
- Boy: {height} cm\n\
- Kilo: {weight} kg\n\
- Hedef: {goal}\n\n\
Kurallar:\n\
1. Yalnızca tek bir JSON nesnesi döndür. Markdown, kod bloğu veya açıklama ekleme.\n\
2. Nesne şu şemaya birebir uymalı:\n{schema}\n\
3. 4 ile 7 arasında hareket olsun.\n\
4. Hareket adları Türkçe olsun.",
        age = or_unspecified(user.age.as_deref()),
        height = or_unspecified(user.height.as_deref()),
        weight = or_unspecified(user.weight.as_deref()),
        goal = user
            .goal
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or("Genel Sağlık"),
        schema = PLAN_SCHEMA,
    )
}

/// Coaching chat turn with history and today's food log
pub fn chat(message: &str, history: &[ChatMessage], food_log: &[FoodItem]) -> String {
    let mut history_text = String::new();
    for entry in history {
        let speaker = match entry.role {
            ChatRole::User => "Kullanıcı",
            ChatRole::Model => "AI Koç",
        };
        let _ = writeln!(history_text, "{}: {}", speaker, entry.text);
    }

    let mut food_text = String::new();
    if food_log.is_empty() {
        food_text.push_str("Kayıt yok\n");
    }
    for item in food_log {
        let _ = writeln!(
            food_text,
            "- {}: {} kcal, P {} g, K {} g, Y {} g",
            item.name, item.calories, item.protein, item.carbs, item.fat
        );
    }

    format!(
        "Sen FitPulse spor salonu uygulamasının yapay zeka koçusun. \
Kullanıcıyla samimi, motive edici bir dille ve Türkçe konuş. \
Geçmiş konuşmayı dikkate alarak cevap ver.\n\n\
Sohbet geçmişi:\n{history}\n\
Bugünkü beslenme kaydı:\n{food}\n\
Son kullanıcı mesajı: \"{message}\"\n\n\
Kullanıcı açıkça yeni bir antrenman programı isterse cevabına tek bir JSON \
bloğu ekle. Bloğu {start} ve {end} etiketleri arasına koy, kod bloğu \
işareti kullanma. JSON şu şemaya uymalı:\n{schema}\n\
Sohbet metnini bloğun dışına yaz. Program istenmediyse blok ekleme.",
        history = history_text,
        food = food_text,
        message = message,
        start = PLAN_BLOCK_START,
        end = PLAN_BLOCK_END,
        schema = PLAN_SCHEMA,
    )
}

/// Macro estimate for a free-text meal description
pub fn food_analysis(description: &str) -> String {
    format!(
        "Kullanıcı şunu yediğini söyledi: \"{description}\"\n\n\
Yaklaşık besin değerlerini yalnızca tek bir JSON nesnesi olarak döndür, \
markdown veya açıklama ekleme:\n\
{{\n  \"name\": \"Yemeğin kısa adı\",\n  \"calories\": 350,\n  \"protein\": 25,\n  \
\"carbs\": 10,\n  \"fat\": 15\n}}\n\
Sayılar yalnızca sayı olsun; protein, karbonhidrat ve yağ gram cinsinden.",
    )
}

/// One-day meal plan for a calorie target
pub fn nutrition_plan(calories: &str, info: &str) -> String {
    format!(
        "Uzman bir diyetisyen olarak bir günlük örnek beslenme planı hazırla.\n\n\
Günlük kalori hedefi: {calories}\n\
Tercihler ve notlar: {info}\n\n\
Kahvaltı, öğle, akşam ve ara öğünleri listele. Her öğünün yaklaşık protein, \
karbonhidrat ve yağ değerlerini parantez içinde yaz. Sonuna kısa, motive \
edici bir not ekle. Türkçe cevap ver.",
        info = or_unspecified(Some(info)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fitpulse_shared::Role;

    fn member() -> User {
        User {
            id: "m1".to_string(),
            name: "Ali".to_string(),
            email: "ali@x.com".to_string(),
            password: None,
            role: Role::Member,
            avatar_url: None,
            join_date: Utc::now(),
            membership_type: None,
            workout_plan: None,
            assigned_templates: None,
            age: Some("29".to_string()),
            height: None,
            weight: Some("82".to_string()),
            goal: None,
            measurements: None,
            daily_food_log: None,
            nutrition_goal: None,
        }
    }

    #[test]
    fn test_workout_prompt_embeds_profile_with_fallbacks() {
        let prompt = workout_plan(&member());
        assert!(prompt.contains("Yaş: 29"));
        assert!(prompt.contains("Kilo: 82 kg"));
        assert!(prompt.contains("Boy: Belirtilmemiş cm"));
        assert!(prompt.contains("Hedef: Genel Sağlık"));
        assert!(prompt.contains("\"difficulty\""));
    }

    #[test]
    fn test_chat_prompt_embeds_history_food_and_sentinels() {
        let history = vec![
            ChatMessage {
                role: ChatRole::User,
                text: "Selam".to_string(),
            },
            ChatMessage {
                role: ChatRole::Model,
                text: "Merhaba!".to_string(),
            },
        ];
        let food = vec![FoodItem {
            id: "f1".to_string(),
            name: "Yulaf".to_string(),
            calories: 300.0,
            protein: 10.0,
            carbs: 50.0,
            fat: 6.0,
            timestamp: Utc::now(),
        }];

        let prompt = chat("Program yaz", &history, &food);
        assert!(prompt.contains("Kullanıcı: Selam"));
        assert!(prompt.contains("AI Koç: Merhaba!"));
        assert!(prompt.contains("- Yulaf: 300 kcal"));
        assert!(prompt.contains("\"Program yaz\""));
        assert!(prompt.contains(PLAN_BLOCK_START));
        assert!(prompt.contains(PLAN_BLOCK_END));
    }

    #[test]
    fn test_chat_prompt_without_food() {
        assert!(chat("hi", &[], &[]).contains("Kayıt yok"));
    }

    #[test]
    fn test_food_and_nutrition_prompts() {
        assert!(food_analysis("iki yumurta").contains("\"iki yumurta\""));
        let plan = nutrition_plan("2200", "");
        assert!(plan.contains("Günlük kalori hedefi: 2200"));
        assert!(plan.contains("Tercihler ve notlar: Belirtilmemiş"));
    }
}
