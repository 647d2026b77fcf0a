//! Classification prompt template
//!
//! The instruction string sent to the model. Deterministic: the same post
//! always yields the identical prompt. The post is interpolated literally,
//! with no escaping.

/// Moderation categories the model is instructed to choose from
pub const CATEGORIES: [&str; 4] = [
    "safe",
    "religious_hate",
    "sexual_threat",
    "national_offense",
];

/// Build the classification prompt embedding the given post
pub fn build_prompt(post: &str) -> String {
    format!(
        "You are a moderation assistant for a social media app used by Indian users in English and Hinglish.\n\
         \n\
         Classify the following post into ONLY ONE of these categories:\n\
         \n\
         [{categories}]\n\
         \n\
         Guidelines:\n\
         - Abuse, slang, and emotional expressions like depression, anxiety, or self-hate are allowed → classify as safe\n\
         - Religious hate or targeting of any religion is not allowed → classify as religious_hate\n\
         - National hate, anti-country sentiment, terrorism, or attack on any nation's dignity is not allowed → classify as national_offense\n\
         - Any sexual threat, abuse, harassment, or assault-related content is not allowed → classify as sexual_threat\n\
         \n\
         Example Post: \"{post}\"\n\
         Label:",
        categories = CATEGORIES.join(", "),
    )
}
