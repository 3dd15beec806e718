use serde::Serialize;
use url::Url;

use crate::services::team_draw_service::{Slot, TeamDraw};

const WHATSAPP_BASE: &str = "https://wa.me/";

#[derive(Debug, Clone, Serialize)]
pub struct ShareExport {
    pub text: String,
    pub link: String,
}

/// Plain-text lineup suitable for a chat message.
pub fn render_text(draw: &TeamDraw<'_>, title: &str) -> String {
    let mut out = format!("*{}*\n\n", title.trim());
    for team in &draw.teams {
        out.push_str(&format!("*Team {}*\n", team.number));
        for slot in &team.slots {
            match slot {
                Slot::Player(p) => {
                    out.push_str(&format!("- {} ({})\n", p.name, p.gender.as_str()));
                }
                Slot::Open => out.push_str("- Open slot\n"),
            }
        }
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn whatsapp_link(number: Option<&str>, text: &str) -> String {
    let digits: String = number
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let base = format!("{}{}", WHATSAPP_BASE, digits);
    match Url::parse_with_params(&base, &[("text", text)]) {
        Ok(url) => url.to_string(),
        // https prefix plus digits always parses
        Err(_) => base,
    }
}

pub fn export(draw: &TeamDraw<'_>, title: &str, number: Option<&str>) -> ShareExport {
    let text = render_text(draw, title);
    let link = whatsapp_link(number, &text);
    ShareExport { text, link }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Gender, Participant};
    use crate::services::team_draw_service::draw_teams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn text_lists_every_team_and_open_slot() {
        let ana = Participant {
            id: "1".to_string(),
            name: "Ana".to_string(),
            category: Category::Casual,
            gender: Gender::Female,
            confirmed_at: String::new(),
        };
        let input = vec![ana];
        let draw = draw_teams(&input, &mut StdRng::seed_from_u64(1));
        let text = render_text(&draw, "Volleyball Friday");

        assert!(text.starts_with("*Volleyball Friday*\n\n*Team 1*\n- Ana (female)\n"));
        assert_eq!(text.matches("*Team ").count(), 4);
        assert_eq!(text.matches("- Open slot").count(), 23);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn link_strips_number_formatting_and_encodes_text() {
        let link = whatsapp_link(Some("+55 (11) 98643-9388"), "*Team 1*\n- Ana");
        assert!(link.starts_with("https://wa.me/5511986439388?text="));
        assert!(!link.contains('\n'));
        assert!(!link.contains(' '));
    }

    #[test]
    fn link_without_number_opens_contact_picker() {
        let link = whatsapp_link(None, "hi");
        assert_eq!(link, "https://wa.me/?text=hi");
    }
}
