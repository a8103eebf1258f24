//! Requesting-agent classification.
//!
//! The dispatcher branches on who is asking: a social-preview bot gets the
//! lightweight meta-tag card, a search crawler gets the shell with injected
//! tags, a human gets the shell untouched. Classification is a pure
//! substring match over the User-Agent header against configured signature
//! lists — case-insensitive, first match wins, social checked before
//! search.

use crate::config::Config;

/// Who is requesting the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentClass {
    /// An ordinary browser (or anything unrecognized).
    Human,
    /// A link-unfurling crawler for a chat/social platform.
    SocialBot,
    /// A search-engine indexing crawler.
    SearchBot,
}

/// Compiled signature lists for agent classification.
#[derive(Debug, Clone)]
pub struct BotSignatures {
    social: Vec<String>,
    search: Vec<String>,
}

impl BotSignatures {
    /// Build from explicit signature lists (normalized to lowercase).
    pub fn new(social: &[String], search: &[String]) -> Self {
        Self {
            social: social.iter().map(|s| s.to_lowercase()).collect(),
            search: search.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Build from the dispatcher configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.social_signatures, &config.search_signatures)
    }

    /// Classify a User-Agent header value.
    ///
    /// A missing header is a human — a bot that does not identify itself
    /// gets the same page a browser would.
    pub fn classify(&self, user_agent: Option<&str>) -> AgentClass {
        let Some(user_agent) = user_agent else {
            return AgentClass::Human;
        };
        let haystack = user_agent.to_lowercase();

        if self.social.iter().any(|sig| haystack.contains(sig)) {
            return AgentClass::SocialBot;
        }
        if self.search.iter().any(|sig| haystack.contains(sig)) {
            return AgentClass::SearchBot;
        }
        AgentClass::Human
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signatures() -> BotSignatures {
        BotSignatures::from_config(&Config::default())
    }

    #[test]
    fn missing_header_is_human() {
        assert_eq!(signatures().classify(None), AgentClass::Human);
    }

    #[test]
    fn browser_is_human() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
        assert_eq!(signatures().classify(Some(ua)), AgentClass::Human);
    }

    #[test]
    fn facebook_unfurler_is_social() {
        let ua = "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)";
        assert_eq!(signatures().classify(Some(ua)), AgentClass::SocialBot);
    }

    #[test]
    fn whatsapp_is_social_case_insensitive() {
        assert_eq!(
            signatures().classify(Some("WhatsApp/2.23.20 A")),
            AgentClass::SocialBot
        );
        assert_eq!(
            signatures().classify(Some("whatsapp/2.23.20 a")),
            AgentClass::SocialBot
        );
    }

    #[test]
    fn googlebot_is_search() {
        let ua = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
        assert_eq!(signatures().classify(Some(ua)), AgentClass::SearchBot);
    }

    #[test]
    fn bingbot_is_search() {
        let ua = "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)";
        assert_eq!(signatures().classify(Some(ua)), AgentClass::SearchBot);
    }

    #[test]
    fn social_wins_over_search() {
        // A signature in both lists classifies as social: first match wins
        // and social is checked first.
        let sigs = BotSignatures::new(
            &["twitterbot".to_string()],
            &["twitterbot".to_string(), "googlebot".to_string()],
        );
        assert_eq!(
            sigs.classify(Some("Twitterbot/1.0")),
            AgentClass::SocialBot
        );
    }

    #[test]
    fn unknown_bot_is_human() {
        assert_eq!(
            signatures().classify(Some("SomeRandomScraper/0.1")),
            AgentClass::Human
        );
    }

    #[test]
    fn signature_in_middle_of_header_matches() {
        let ua = "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)";
        assert_eq!(signatures().classify(Some(ua)), AgentClass::SocialBot);
    }

    #[test]
    fn custom_signatures_respected() {
        let sigs = BotSignatures::new(&["unfurlbot".to_string()], &[]);
        assert_eq!(
            sigs.classify(Some("Mozilla/5.0 UnfurlBot/3.1")),
            AgentClass::SocialBot
        );
        // Defaults are not implicitly merged in.
        assert_eq!(
            sigs.classify(Some("WhatsApp/2.0")),
            AgentClass::Human
        );
    }
}
