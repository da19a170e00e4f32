// Prompt templates for the admissions advisor.
// Cross-cutting fragments (JSON-only instruction, language line) come from
// llm_client::prompts.

use serde_json::json;

use crate::catalog::Catalog;
use crate::i18n::Language;
use crate::llm_client::prompts::{fill, response_language_line, JSON_ONLY_INSTRUCTION};
use crate::models::{StudentProfile, University, UserProfile};

/// Advisor persona. Replace `{catalog_json}` with [`catalog_summary`] once at
/// startup; the catalog is static for the life of the process.
pub const ADVISOR_SYSTEM_TEMPLATE: &str = r#"Ты — профессиональный консультант по поступлению в вузы Казахстана "DataHub Advisor".
Твоя главная цель: Помочь абитуриенту найти идеальный вуз и оценить шансы на грант.

Твои знания:
1. **База данных**: Ты имеешь доступ к списку вузов: {catalog_json}.
2. **ЕНТ (Единое Национальное Тестирование)**:
    - Максимальный балл: 140. Проходной в нац. вузы ~65, в остальные ~50. Медицина ~70.
    - Гранты: >110 баллов — высокие шансы на IT/Юриспруденцию/Медицину. 90-100 — средние шансы.

Стиль общения: Дружелюбный, экспертный, поддерживающий, на языке пользователя (KZ/RU). Используй эмодзи 🎓, 🇰🇿, 📚."#;

pub const PORTFOLIO_SYSTEM: &str =
    "Ты — эксперт приемной комиссии уровня Ivy League и NU. Будь строгим, но конструктивным.";

/// Replace: {ids}, {language_line}, {data_json}, {values_example}, {json_only}
pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"Сравни следующие университеты (IDs: {ids}).
{language_line}

Данные: {data_json}

{json_only}
Структура JSON:
{
  "summary": "Краткое общее резюме сравнения (1-2 предложения)",
  "verdict": "Итоговый совет: кому что выбрать",
  "table": [
    {
      "criteria": "Название критерия (например: Репутация, Локация, Сложность поступления)",
      "values": {values_example}
    }
  ]
}
Ключи "values" — ровно эти IDs, для каждого критерия."#;

/// Replace: {score}, {subject_pair}, {city}, {interests}, {ids}, {language_line}, {json_only}
pub const GUIDANCE_PROMPT_TEMPLATE: &str = r#"Я абитуриент. Мой профиль:
- Балл ЕНТ: {score} (Макс 140)
- Профильные предметы: {subject_pair}
- Предпочтительный город: {city}
- Интересы: {interests}

Задача: Подбери 3-4 университета из списка (IDs: {ids}), которые ИДЕАЛЬНО подходят для поступления.

{language_line}

{json_only}
Структура JSON:
{
  "recommendations": [
    {
      "uniId": "id вуза (например 'nu' или 'kbtu')",
      "programName": "Конкретная образовательная программа",
      "matchPercentage": 95,
      "grantChance": 85,
      "employmentChance": 92,
      "salaryForecast": "450 000 ₸",
      "reason": "Почему этот вуз? (1-2 предложения)",
      "risk": "Особенность или сложность (1 предложение)"
    }
  ],
  "twinProfile": {
    "academicLevel": "Оценка уровня (Высокий/Средний/Начальный)",
    "strengths": ["Сильная сторона 1", "Сильная сторона 2"],
    "weaknesses": ["Зона роста 1", "Зона роста 2"],
    "learningStyle": "Стиль обучения"
  },
  "twinStats": {
    "foundCount": 850,
    "avgScore": 95,
    "successRate": "Текст об успехе (например: 87% поступили на грант)",
    "similarInterests": ["интерес 1", "интерес 2"]
  }
}
matchPercentage, grantChance и employmentChance — числа от 0 до 100."#;

/// Replace: {name}, {grade}, {gpa}, {score}, {subject_pair}, {interests},
///          {targets}, {portfolio}, {bio}, {language_line}, {json_only}
pub const PORTFOLIO_PROMPT_TEMPLATE: &str = r#"Проанализируй полный профиль абитуриента для поступления в вузы Казахстана и зарубежья.

Данные абитуриента:
- Имя: {name}
- Класс: {grade}, GPA: {gpa}/5.0
- ЕНТ/Тесты: {score} баллов, предметы: {subject_pair}
- Интересы: {interests}
- Целевые вузы: {targets}
- Портфолио/Достижения: {portfolio}
- Био: {bio}

Задачи:
1. Оцени силу профиля (0-100).
2. Gap Analysis: Чего не хватает для поступления в топовые вузы (NU, KBTU, SDU и т.д.)?
3. План действий (Roadmap).
4. Идеи для эссе (Motivation Letter).

{language_line}

{json_only}
{
  "overallScore": 75,
  "summary": "Краткий анализ профиля (2-3 предложения)",
  "gapAnalysis": [
    { "target": "Общая конкурентоспособность или конкретный вуз", "missing": ["Текст 1", "Текст 2"] }
  ],
  "roadmap": [
    { "period": "Ближайший месяц", "action": "Действие", "impact": "High" }
  ],
  "essayTopics": ["Тема 1", "Тема 2", "Тема 3"]
}
"impact" — "High" или "Medium"."#;

/// Compact catalog digest embedded in the advisor persona.
pub fn catalog_summary(catalog: &Catalog) -> String {
    let rows: Vec<_> = catalog
        .universities()
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "short": u.short_name,
                "loc": u.location,
                "programs": u.programs.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "),
                "fee": u.tuition_avg,
                "rank": u.ranking,
                "cat": u.category,
            })
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}

pub fn advisor_system(catalog: &Catalog) -> String {
    ADVISOR_SYSTEM_TEMPLATE.replace("{catalog_json}", &catalog_summary(catalog))
}

pub fn comparison_prompt(universities: &[&University], lang: Language) -> String {
    let data: Vec<_> = universities
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "short": u.short_name,
                "location": u.location,
                "ranking": u.ranking,
                "tuition": u.tuition_avg,
                "programs": u.programs.iter().take(5).map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "),
                "description": u.description,
            })
        })
        .collect();
    let values_example: serde_json::Map<String, serde_json::Value> = universities
        .iter()
        .enumerate()
        .map(|(i, u)| (u.id.clone(), json!(format!("Краткая оценка вуза {}", i + 1))))
        .collect();
    let ids: Vec<&str> = universities.iter().map(|u| u.id.as_str()).collect();

    fill(
        COMPARISON_PROMPT_TEMPLATE,
        &[
            ("ids", ids.join(", ").as_str()),
            ("language_line", response_language_line(lang).as_str()),
            ("data_json", serde_json::Value::Array(data).to_string().as_str()),
            (
                "values_example",
                serde_json::Value::Object(values_example).to_string().as_str(),
            ),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub fn guidance_prompt(profile: &UserProfile, catalog: &Catalog, lang: Language) -> String {
    let ids: Vec<&str> = catalog.universities().iter().map(|u| u.id.as_str()).collect();
    fill(
        GUIDANCE_PROMPT_TEMPLATE,
        &[
            ("score", profile.score.to_string().as_str()),
            ("subject_pair", profile.subject_pair.as_str()),
            ("city", profile.city.as_str()),
            ("interests", profile.interests.join(", ").as_str()),
            ("ids", ids.join(", ").as_str()),
            ("language_line", response_language_line(lang).as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub fn portfolio_prompt(student: &StudentProfile, catalog: &Catalog, lang: Language) -> String {
    let portfolio = student
        .portfolio
        .iter()
        .map(|p| format!("{:?}: {} ({}, {})", p.category, p.title, p.issuer, p.date))
        .collect::<Vec<_>>()
        .join("; ");
    let targets = catalog
        .universities_by_ids(&student.target_universities)
        .iter()
        .map(|u| u.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let or = |value: String, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    };

    fill(
        PORTFOLIO_PROMPT_TEMPLATE,
        &[
            ("name", student.name.as_str()),
            ("grade", student.grade.to_string().as_str()),
            ("gpa", student.gpa.to_string().as_str()),
            ("score", student.quiz.score.to_string().as_str()),
            ("subject_pair", student.quiz.subject_pair.as_str()),
            ("interests", student.quiz.interests.join(", ").as_str()),
            ("targets", or(targets, "Не выбраны").as_str()),
            ("portfolio", or(portfolio, "Нет загруженных достижений").as_str()),
            (
                "bio",
                or(student.bio.clone().unwrap_or_default(), "Не указано").as_str(),
            ),
            ("language_line", response_language_line(lang).as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}
