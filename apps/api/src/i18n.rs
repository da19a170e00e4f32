//! UI language and the handful of user-facing strings produced server-side.
//!
//! The full interface dictionary lives with the client; the service only needs
//! the strings it returns itself (chat fallbacks, empty states, suggestion
//! labels) and the language name it asks the model to answer in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    Kz,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::Kz => "kz",
            Language::En => "en",
        }
    }

    /// Name of the language as written into prompts ("Язык ответа: ...").
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::Ru => "Русский",
            Language::Kz => "Казахский",
            Language::En => "Английский",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ChatGreeting,
    ChatEmptyReply,
    ChatUnavailable,
    NavProfessions,
    NavPrograms,
    CompareMin,
    NotFound,
    FavoritesEmpty,
    AnalysisFailed,
    MissingSelection,
    MissingQuizProfile,
}

/// Looks up a message. Every key is defined for every language.
pub fn t(lang: Language, msg: Message) -> &'static str {
    use Language::*;
    use Message::*;
    match (msg, lang) {
        (ChatGreeting, Ru) => "Салем! 👋 Я твой консультант DataHub. Помогу выбрать университет, оценить шансы на грант и отвечу на вопросы о поступлении. Спрашивай! 🚀",
        (ChatGreeting, Kz) => "Сәлем! 👋 Мен DataHub кеңесшісімін. Университет таңдауға, грантқа түсу мүмкіндігін бағалауға көмектесемін. Сұрай бер! 🚀",
        (ChatGreeting, En) => "Hi! 👋 I'm your DataHub advisor. I can help you pick a university, estimate your grant chances and answer admission questions. Ask away! 🚀",

        (ChatEmptyReply, Ru) => "Извините, я не смог сгенерировать ответ.",
        (ChatEmptyReply, Kz) => "Кешіріңіз, жауап құрастыра алмадым.",
        (ChatEmptyReply, En) => "Sorry, I couldn't generate a reply.",

        (ChatUnavailable, Ru) => "Произошла ошибка при обращении к AI сервису. Пожалуйста, проверьте API ключ.",
        (ChatUnavailable, Kz) => "AI қызметіне қосылу кезінде қате пайда болды. API кілтін тексеріңіз.",
        (ChatUnavailable, En) => "Something went wrong while contacting the AI service. Please check the API key.",

        (NavProfessions, Ru) => "Профессии",
        (NavProfessions, Kz) => "Мамандықтар",
        (NavProfessions, En) => "Professions",

        (NavPrograms, Ru) => "Программы",
        (NavPrograms, Kz) => "Бағдарламалар",
        (NavPrograms, En) => "Programs",

        (CompareMin, Ru) => "Выберите минимум 2 университета для сравнения",
        (CompareMin, Kz) => "Салыстыру үшін кемінде 2 университет таңдаңыз",
        (CompareMin, En) => "Select at least 2 universities to compare",

        (NotFound, Ru) => "Ничего не найдено",
        (NotFound, Kz) => "Ештеңе табылмады",
        (NotFound, En) => "Nothing found",

        (FavoritesEmpty, Ru) => "В избранном пока пусто",
        (FavoritesEmpty, Kz) => "Таңдаулылар әзірге бос",
        (FavoritesEmpty, En) => "No favorites yet",

        (AnalysisFailed, Ru) => "Ошибка анализа",
        (AnalysisFailed, Kz) => "Талдау қатесі",
        (AnalysisFailed, En) => "Analysis failed",

        (MissingSelection, Ru) => "Запись не выбрана",
        (MissingSelection, Kz) => "Жазба таңдалмаған",
        (MissingSelection, En) => "Nothing is selected",

        (MissingQuizProfile, Ru) => "Сначала пройдите тест",
        (MissingQuizProfile, Kz) => "Алдымен тесттен өтіңіз",
        (MissingQuizProfile, En) => "Take the quiz first",
    }
}
