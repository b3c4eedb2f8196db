//! Print-ready badge data.
//!
//! A `BadgeSheet` carries everything an external renderer needs to lay out
//! member cards: display text, the photo, and the string to encode in the
//! QR symbol. Drawing the card and encoding the QR symbol happen elsewhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Member;
use crate::utils::tel_uri;

/// CR80 card, portrait, in millimetres
pub const CARD_WIDTH_MM: f32 = 54.0;
pub const CARD_HEIGHT_MM: f32 = 85.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct BadgeCard {
    pub member_id: String,
    /// Surname in capitals, as printed on the card
    pub surname: String,
    pub given_names: String,
    pub role: String,
    pub contact: String,
    pub baptism_date: String,
    pub membership_date: String,
    pub photo: String,
    pub qr_text: String,
}

impl BadgeCard {
    /// Stored QR string if any, otherwise derived from the contact
    pub fn from_member(member: &Member, country_prefix: &str) -> Self {
        let qr_text = if member.qr_code.trim().is_empty() {
            tel_uri(&member.contact, country_prefix)
        } else {
            member.qr_code.clone()
        };

        Self {
            member_id: member.id.clone(),
            surname: member.surname.to_uppercase(),
            given_names: member.given_names.clone(),
            role: member.role.clone(),
            contact: member.contact.clone(),
            baptism_date: member.baptism_date.clone(),
            membership_date: member.membership_date.clone(),
            photo: member.photo.clone(),
            qr_text,
        }
    }
}

/// One card per page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeSheet {
    pub file_name: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub cards: Vec<BadgeCard>,
}

impl BadgeSheet {
    /// File named after the member, e.g. `badge_Kouassi_Ama.pdf`
    pub fn single(member: &Member, country_prefix: &str) -> Self {
        Self::with_cards(
            format!(
                "badge_{}_{}.pdf",
                file_safe(&member.surname),
                file_safe(&member.given_names)
            ),
            vec![BadgeCard::from_member(member, country_prefix)],
        )
    }

    pub fn all(members: &[Member], date: NaiveDate, country_prefix: &str) -> Self {
        Self::with_cards(
            format!("tous_les_badges_{}.pdf", date.format("%Y-%m-%d")),
            members
                .iter()
                .map(|m| BadgeCard::from_member(m, country_prefix))
                .collect(),
        )
    }

    fn with_cards(file_name: String, cards: Vec<BadgeCard>) -> Self {
        Self {
            file_name,
            page_width_mm: CARD_WIDTH_MM,
            page_height_mm: CARD_HEIGHT_MM,
            cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Path separators and whitespace would break the suggested file name
fn file_safe(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(id: &str, contact: &str, qr_code: &str) -> Member {
        Member {
            id: id.to_string(),
            surname: "Kouassi".to_string(),
            given_names: "Ama".to_string(),
            role: "Diaconesse".to_string(),
            contact: contact.to_string(),
            baptism_date: "2001-06-17".to_string(),
            membership_date: "2010-09-05".to_string(),
            photo: "data:image/jpeg;base64,/9j/".to_string(),
            qr_code: qr_code.to_string(),
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_card_uses_stored_qr_code() {
        let card = BadgeCard::from_member(&member("m1", "0102030405", "tel:+225999"), "+225");
        assert_eq!(card.qr_text, "tel:+225999");
        assert_eq!(card.surname, "KOUASSI");
    }

    #[test]
    fn test_card_derives_missing_qr_code() {
        let card = BadgeCard::from_member(&member("m1", "01 02 03 04 05", ""), "+225");
        assert_eq!(card.qr_text, "tel:+225102030405");
    }

    #[test]
    fn test_sheet_file_names() {
        let m = member("m1", "0102030405", "");
        let single = BadgeSheet::single(&m, "+225");
        assert_eq!(single.file_name, "badge_Kouassi_Ama.pdf");
        assert_eq!(single.cards.len(), 1);
        assert_eq!(single.page_width_mm, CARD_WIDTH_MM);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let all = BadgeSheet::all(&[m.clone(), member("m2", "0708", "")], date, "+225");
        assert_eq!(all.file_name, "tous_les_badges_2024-03-01.pdf");
        assert_eq!(all.cards.len(), 2);

        assert!(BadgeSheet::all(&[], date, "+225").is_empty());
    }

    #[test]
    fn test_single_file_name_is_path_safe() {
        let mut m = member("m1", "0102030405", "");
        m.surname = "N'Guessan".to_string();
        m.given_names = "Ama Grace/Eve".to_string();
        let sheet = BadgeSheet::single(&m, "+225");
        assert_eq!(sheet.file_name, "badge_N'Guessan_Ama_Grace_Eve.pdf");
    }
}
