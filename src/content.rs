use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::{ParseError, Url};

use crate::relay::DEFAULT_FORM_ENDPOINT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub description: Vec<String>,
    pub profile_image: String,
    pub profile_gif: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Usernames {
    pub github: String,
    pub leetcode: String, // blank if there is no LeetCode profile
}

/// Outbound channels. Any of these may be blank, meaning "not rendered".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub github: String,
    pub linkedin: String,
    pub leetcode: String,
    pub instagram: String,
    pub email: String,
    pub resume: String,
    pub phone: String,
    pub whatsapp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    GitHub,
    LinkedIn,
    LeetCode,
    Instagram,
    Email,
    Resume,
    Phone,
    WhatsApp,
}

impl ChannelKind {
    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::GitHub => "GitHub",
            ChannelKind::LinkedIn => "LinkedIn",
            ChannelKind::LeetCode => "LeetCode",
            ChannelKind::Instagram => "Instagram",
            ChannelKind::Email => "Send Email",
            ChannelKind::Resume => "Resume",
            ChannelKind::Phone => "Phone",
            ChannelKind::WhatsApp => "WhatsApp",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ChannelKind::GitHub => "GH",
            ChannelKind::LinkedIn => "in",
            ChannelKind::LeetCode => "LC",
            ChannelKind::Instagram => "IG",
            ChannelKind::Email => "@",
            ChannelKind::Resume => "CV",
            ChannelKind::Phone => "PH",
            ChannelKind::WhatsApp => "WA",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub kind: ChannelKind,
    pub uri: String,
}

impl SocialLinks {
    pub fn channels(&self) -> Vec<Channel> {
        [
            (ChannelKind::GitHub, &self.github),
            (ChannelKind::LinkedIn, &self.linkedin),
            (ChannelKind::LeetCode, &self.leetcode),
            (ChannelKind::Instagram, &self.instagram),
            (ChannelKind::Email, &self.email),
            (ChannelKind::Resume, &self.resume),
            (ChannelKind::Phone, &self.phone),
            (ChannelKind::WhatsApp, &self.whatsapp),
        ]
        .into_iter()
        .map(|(kind, uri)| Channel {
            kind,
            uri: uri.clone(),
        })
        .collect()
    }

    /// Channels with a usable target, with their URIs normalized.
    pub fn visible(&self) -> Vec<Channel> {
        self.channels()
            .into_iter()
            .filter_map(|c| {
                href(&c.uri).map(|uri| Channel { kind: c.kind, uri })
            })
            .collect()
    }

    pub fn get(&self, kind: ChannelKind) -> &str {
        match kind {
            ChannelKind::GitHub => &self.github,
            ChannelKind::LinkedIn => &self.linkedin,
            ChannelKind::LeetCode => &self.leetcode,
            ChannelKind::Instagram => &self.instagram,
            ChannelKind::Email => &self.email,
            ChannelKind::Resume => &self.resume,
            ChannelKind::Phone => &self.phone,
            ChannelKind::WhatsApp => &self.whatsapp,
        }
    }
}

/// A titled group of channels on the contact section.
#[derive(Debug, Clone)]
pub struct ContactCard {
    pub title: &'static str,
    pub channels: Vec<Channel>,
}

const CONTACT_CARDS: [(&str, &[ChannelKind]); 2] = [
    (
        "Profiles & Links",
        &[ChannelKind::GitHub, ChannelKind::LinkedIn, ChannelKind::LeetCode],
    ),
    ("Get in Touch", &[ChannelKind::WhatsApp, ChannelKind::Email]),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    pub link: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub company_link: String,
    pub role: String,
    pub period: String,
    pub location: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub institution_link: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    pub profile: Profile,
    pub usernames: Usernames,
    pub links: SocialLinks,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub form_endpoint: String,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            usernames: Usernames::default(),
            links: SocialLinks::default(),
            skills: Vec::new(),
            projects: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            form_endpoint: DEFAULT_FORM_ENDPOINT.to_string(),
        }
    }
}

static BUILTIN: Lazy<Portfolio> = Lazy::new(builtin_portfolio);

impl Portfolio {
    pub fn builtin() -> &'static Portfolio {
        &BUILTIN
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
        let portfolio: Portfolio = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse profile file: {}", path.display()))?;
        Ok(portfolio)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize portfolio")
    }

    pub fn contact_cards(&self) -> Vec<ContactCard> {
        CONTACT_CARDS
            .iter()
            .filter_map(|&(title, kinds)| {
                let channels: Vec<Channel> = kinds
                    .iter()
                    .filter_map(|&kind| {
                        href(self.links.get(kind)).map(|uri| Channel { kind, uri })
                    })
                    .collect();
                if channels.is_empty() {
                    None
                } else {
                    Some(ContactCard { title, channels })
                }
            })
            .collect()
    }
}

/// Normalizes a link target for display. Blank input yields `None`.
///
/// Anything with a leading URI scheme passes through; bare `+` numbers
/// become `tel:` links and everything else is treated as a web host.
pub fn href(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let uri = match Url::parse(trimmed) {
        // Phone numbers are stored bare
        Err(ParseError::RelativeUrlWithoutBase) if trimmed.starts_with('+') => {
            format!("tel:{}", compact(trimmed))
        }
        Err(ParseError::RelativeUrlWithoutBase) => format!("https://{}", trimmed),
        // A scheme is present even if the rest is malformed
        _ => trimmed.to_string(),
    };

    if uri.contains("wa.me/") {
        Some(compact(&uri))
    } else {
        Some(uri)
    }
}

fn compact(s: &str) -> String {
    s.split_whitespace().collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_portfolio() -> Portfolio {
    Portfolio {
        profile: Profile {
            name: "Adhil Unnikrishnan P".to_string(),
            title: "Backend Developer".to_string(),
            location: "Irinjalakuda, Thrissur, Kerala, India".to_string(),
            email: "adhilunnikrishnanofficial@gmail.com".to_string(),
            description: strings(&[
                "Hi, I'm Adhil Unnikrishnan P, a backend developer with a strong focus on building reliable, scalable, and secure server-side applications. I enjoy solving complex problems and turning ideas into efficient APIs and systems.",
                "I'm passionate about developing secure authentication flows, robust RESTful APIs, and intelligent data-driven applications. I enjoy crafting backend systems that are scalable, maintainable, and built with clean, modern architecture.",
            ]),
            profile_image: "/profile-image.png".to_string(),
            profile_gif: "/profile-gif.gif".to_string(),
        },
        usernames: Usernames {
            github: "adhilunnikrishnan".to_string(),
            leetcode: "adhilunnikrishnan".to_string(),
        },
        links: SocialLinks {
            github: "https://github.com/adhilunnikrishnan".to_string(),
            linkedin: "https://www.linkedin.com/in/adhilunnikrishnan/".to_string(),
            leetcode: "https://leetcode.com/u/adhilunnikrishnan/".to_string(),
            instagram: String::new(),
            email: "mailto:adhilunnikrishnanofficial@gmail.com".to_string(),
            resume: "https://drive.google.com/file/d/1lf2eQpjK10k9CFMpI7HCLGmskxRb3hdT/view?usp=sharing".to_string(),
            phone: "+91 7907933057".to_string(),
            whatsapp: "https://wa.me/ 7907933057".to_string(),
        },
        skills: vec![
            SkillGroup {
                category: "Frontend".to_string(),
                items: strings(&["HTML", "CSS", "JavaScript", "TypeScript", "Bootstrap"]),
            },
            SkillGroup {
                category: "Backend".to_string(),
                items: strings(&["Node.js", "Express.js"]),
            },
            SkillGroup {
                category: "Databases".to_string(),
                items: strings(&["MongoDB", "MySQL", "PostgreSQL", "Redis"]),
            },
            SkillGroup {
                category: "Languages".to_string(),
                items: strings(&["JavaScript", "TypeScript"]),
            },
            SkillGroup {
                category: "Cloud & DevOps".to_string(),
                items: strings(&["AWS", "Docker", "Vercel", "GitHub Actions"]),
            },
            SkillGroup {
                category: "Tools".to_string(),
                items: strings(&[
                    "VS Code", "Git", "GitHub", "GitLab", "Postman", "Figma", "Jest", "Windows",
                ]),
            },
        ],
        projects: vec![
            Project {
                name: "task-manager-api-ts".to_string(),
                description: "A production-ready Task Manager REST API built with TypeScript, Express, PostgreSQL, Prisma, and Redis, featuring secure auth, role-based access, task management, comments, user controls, and Cloudinary uploads.".to_string(),
                tech: strings(&[
                    "Node.js",
                    "TypeScript",
                    "JWT",
                    "Redis",
                    "PostgreSQL",
                    "Prisma ORM",
                    "argon2",
                    "Cloudinary",
                    "Jest + Supertest",
                ]),
                link: String::new(),
                github: "https://github.com/adhilunnikrishnan/node-rest-api-typescript".to_string(),
            },
            Project {
                name: "Moonlight-Reads-Ecommerce-WebApp".to_string(),
                description: "Moonlight Reads is designed to offer a modern online bookstore experience for passionate readers. Users can explore a vast collection of books, add favorites to their wishlist, manage their cart, and place orders effortlessly. Admins can efficiently manage books, users, and orders to ensure a smooth and enjoyable reading journey for every customer.".to_string(),
                tech: strings(&[
                    "Node.js",
                    "JavaScript",
                    "Bootstrap 5",
                    "Handlebars",
                    "Chart.js",
                    "Express.js",
                    "Multer",
                    "MongoDBAtlas",
                    "JWT",
                ]),
                link: "moonlight-reads.onrender.com/".to_string(),
                github: "https://github.com/adhilunnikrishnan/Moonlight-Reads-Ecommerce-WebApp".to_string(),
            },
        ],
        experience: vec![Experience {
            company: "G-Tec Computer Education".to_string(),
            company_link: String::new(),
            role: "Full Stack Development Intern".to_string(),
            period: "Jul 2025 - Feb 2026 (Expected)".to_string(),
            location: "Onsite".to_string(),
            description: "Working on full-stack development with a focus on backend engineering. Building secure RESTful APIs, implementing caching and session management with Redis, designing scalable architectures, and integrating relational and NoSQL databases. Gaining hands-on experience with containerization, API performance optimization, and modern JavaScript development workflows.".to_string(),
            skills: strings(&[
                "Node.js",
                "Express.js",
                "JavaScript",
                "TypeScript",
                "React",
                "PostgreSQL",
                "MongoDB",
                "Redis",
                "Docker",
                "REST APIs",
                "Backend Architecture",
            ]),
        }],
        education: vec![
            Education {
                degree: "Senior Secondary (Plus Two)".to_string(),
                institution: "National Higher Secondary School".to_string(),
                institution_link: String::new(),
                period: "Jul 2023 - Mar 2025".to_string(),
            },
            Education {
                degree: "Secondary (SSLC)".to_string(),
                institution: "St.Mary's Higher Secondary School".to_string(),
                institution_link: String::new(),
                period: "Jul 2022 - Mar 2023".to_string(),
            },
        ],
        form_endpoint: DEFAULT_FORM_ENDPOINT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_blank_is_none() {
        assert_eq!(href(""), None);
        assert_eq!(href("   "), None);
    }

    #[test]
    fn test_href_normalization() {
        assert_eq!(
            href("moonlight-reads.onrender.com/"),
            Some("https://moonlight-reads.onrender.com/".to_string())
        );
        assert_eq!(
            href("https://wa.me/ 7907933057"),
            Some("https://wa.me/7907933057".to_string())
        );
        assert_eq!(
            href("mailto:someone@example.com"),
            Some("mailto:someone@example.com".to_string())
        );
        assert_eq!(href("+91 7907933057"), Some("tel:+917907933057".to_string()));
        assert_eq!(
            href("  https://github.com/x  "),
            Some("https://github.com/x".to_string())
        );
    }

    #[test]
    fn test_href_keeps_any_leading_scheme() {
        assert_eq!(href("sms:+15551234"), Some("sms:+15551234".to_string()));
        assert_eq!(href("tel:+15551234"), Some("tel:+15551234".to_string()));
        assert_eq!(
            href("skype:someone?call"),
            Some("skype:someone?call".to_string())
        );
    }

    #[test]
    fn test_href_scheme_inside_query_still_gets_https() {
        assert_eq!(
            href("example.com/?next=https://x.io"),
            Some("https://example.com/?next=https://x.io".to_string())
        );
        assert_eq!(
            href("wa.me/91 7907933057"),
            Some("https://wa.me/917907933057".to_string())
        );
    }

    #[test]
    fn test_visible_skips_blank_channels() {
        let links = &Portfolio::builtin().links;
        assert_eq!(links.channels().len(), 8);

        let visible = links.visible();
        assert_eq!(visible.len(), 7);
        assert!(visible.iter().all(|c| c.kind != ChannelKind::Instagram));
        assert!(visible.iter().all(|c| !c.uri.is_empty()));
    }

    #[test]
    fn test_visible_preserves_order() {
        let links = SocialLinks {
            email: "mailto:a@b.c".to_string(),
            github: "https://github.com/a".to_string(),
            ..Default::default()
        };
        let kinds: Vec<ChannelKind> = links.visible().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChannelKind::GitHub, ChannelKind::Email]);
    }

    #[test]
    fn test_contact_cards_drop_empty_cards() {
        let portfolio = Portfolio {
            links: SocialLinks {
                email: "mailto:a@b.c".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let cards = portfolio.contact_cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Get in Touch");
        assert_eq!(cards[0].channels.len(), 1);
        assert_eq!(cards[0].channels[0].kind, ChannelKind::Email);
    }

    #[test]
    fn test_builtin_contact_cards() {
        let cards = Portfolio::builtin().contact_cards();
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Profiles & Links", "Get in Touch"]);
        assert_eq!(cards[0].channels.len(), 3);
        assert_eq!(cards[1].channels.len(), 2);
    }

    #[test]
    fn test_load_partial_profile_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("folio-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profile.json");
        std::fs::write(
            &path,
            r#"{"profile": {"name": "Jane Doe"}, "links": {"github": "https://github.com/jane"}}"#,
        )
        .unwrap();

        let portfolio = Portfolio::load(&path).unwrap();
        assert_eq!(portfolio.profile.name, "Jane Doe");
        assert!(portfolio.projects.is_empty());
        assert_eq!(portfolio.form_endpoint, DEFAULT_FORM_ENDPOINT);
        assert_eq!(portfolio.links.visible().len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_roundtrip_keeps_display_order() {
        let json = Portfolio::builtin().to_json().unwrap();
        let back: Portfolio = serde_json::from_str(&json).unwrap();
        let names: Vec<&str> = back.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["task-manager-api-ts", "Moonlight-Reads-Ecommerce-WebApp"]
        );
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = Portfolio::load(Path::new("/nonexistent/folio/profile.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile file"));
    }
}
