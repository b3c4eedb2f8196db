use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::tel_uri;

/// Column the remote table is sorted by when listing.
pub const REGISTERED_AT_COLUMN: &str = "dateInscription";

/// Nullable text columns come back as `null` from the remote; treat them as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A registered member, as stored in the remote `members` table.
///
/// `id` and `registered_at` are assigned by the coordinator on creation and
/// are never part of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Member {
    pub id: String,
    #[serde(rename = "nom", default, deserialize_with = "null_as_default")]
    pub surname: String,
    #[serde(rename = "prenoms", default, deserialize_with = "null_as_default")]
    pub given_names: String,
    #[serde(rename = "poste", default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: String,
    #[serde(rename = "dateBapteme", default, deserialize_with = "null_as_default")]
    pub baptism_date: String,
    #[serde(rename = "dateAdhesion", default, deserialize_with = "null_as_default")]
    pub membership_date: String,
    /// Embedded image as a `data:` URI
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo: String,
    #[serde(rename = "qrcode", default, deserialize_with = "null_as_default")]
    pub qr_code: String,
    #[serde(rename = "dateInscription")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub registered_at: DateTime<Utc>,
}

impl Member {
    /// "Given names Surname", the way badges and confirmations address a member
    pub fn full_name(&self) -> String {
        match (self.given_names.trim(), self.surname.trim()) {
            ("", "") => String::new(),
            ("", surname) => surname.to_string(),
            (given, "") => given.to_string(),
            (given, surname) => format!("{} {}", given, surname),
        }
    }
}

/// Fields collected by the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewMember {
    #[serde(rename = "nom")]
    pub surname: String,
    #[serde(rename = "prenoms")]
    pub given_names: String,
    #[serde(rename = "poste")]
    pub role: String,
    pub contact: String,
    #[serde(rename = "dateBapteme", default)]
    pub baptism_date: String,
    #[serde(rename = "dateAdhesion", default)]
    pub membership_date: String,
    #[serde(default)]
    pub photo: String,
    /// Derived from `contact` when absent
    #[serde(rename = "qrcode", default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl NewMember {
    /// Build the stored record. The caller supplies identity and timestamp.
    pub fn into_member(self, id: String, registered_at: DateTime<Utc>, country_prefix: &str) -> Member {
        let qr_code = match self.qr_code {
            Some(qr) if !qr.trim().is_empty() => qr,
            _ => tel_uri(&self.contact, country_prefix),
        };

        Member {
            id,
            surname: self.surname,
            given_names: self.given_names,
            role: self.role,
            contact: self.contact,
            baptism_date: self.baptism_date,
            membership_date: self.membership_date,
            photo: self.photo,
            qr_code,
            registered_at,
        }
    }
}

/// A partial update. Serializes only the fields that are set, so it can be
/// sent as-is as the body of a remote update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberPatch {
    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(rename = "prenoms", default, skip_serializing_if = "Option::is_none")]
    pub given_names: Option<String>,
    #[serde(rename = "poste", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(rename = "dateBapteme", default, skip_serializing_if = "Option::is_none")]
    pub baptism_date: Option<String>,
    #[serde(rename = "dateAdhesion", default, skip_serializing_if = "Option::is_none")]
    pub membership_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "qrcode", default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl MemberPatch {
    pub fn is_empty(&self) -> bool {
        self.surname.is_none()
            && self.given_names.is_none()
            && self.role.is_none()
            && self.contact.is_none()
            && self.baptism_date.is_none()
            && self.membership_date.is_none()
            && self.photo.is_none()
            && self.qr_code.is_none()
    }

    /// Re-derive the QR payload when the contact changes without an explicit one.
    pub fn with_derived_qr_code(mut self, country_prefix: &str) -> Self {
        if self.qr_code.is_none() {
            if let Some(ref contact) = self.contact {
                self.qr_code = Some(tel_uri(contact, country_prefix));
            }
        }
        self
    }
}

/// Ordering requested from the remote directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub ascending: bool,
}

impl SortOrder {
    /// Registration timestamp, newest first. The default listing order.
    pub fn newest_first() -> Self {
        Self {
            column: REGISTERED_AT_COLUMN,
            ascending: false,
        }
    }

    /// PostgREST `order=` value, e.g. `dateInscription.desc`
    pub fn as_query(&self) -> String {
        format!(
            "{}.{}",
            self.column,
            if self.ascending { "asc" } else { "desc" }
        )
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::newest_first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Member {
        Member {
            id: "m1".to_string(),
            surname: "Kouassi".to_string(),
            given_names: "Ama Grace".to_string(),
            role: "Choriste".to_string(),
            contact: "07 08 09 10 11".to_string(),
            baptism_date: "2010-04-04".to_string(),
            membership_date: "2015-01-10".to_string(),
            photo: "data:image/png;base64,AAAA".to_string(),
            qr_code: "tel:+225708091011".to_string(),
            registered_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_member_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["nom"], "Kouassi");
        assert_eq!(json["prenoms"], "Ama Grace");
        assert_eq!(json["poste"], "Choriste");
        assert_eq!(json["dateBapteme"], "2010-04-04");
        assert_eq!(json["dateAdhesion"], "2015-01-10");
        assert_eq!(json["dateInscription"], "2024-03-01T10:00:00Z");
        assert!(json.get("surname").is_none());
    }

    #[test]
    fn test_member_parses_null_columns() {
        let json = r#"{"id":"m2","nom":"Bamba","prenoms":null,"poste":null,"contact":"0102030405","photo":null,"dateInscription":"2024-03-02T08:30:00+00:00"}"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.surname, "Bamba");
        assert_eq!(member.given_names, "");
        assert_eq!(member.photo, "");
        assert_eq!(member.qr_code, "");
    }

    #[test]
    fn test_full_name() {
        let mut m = sample();
        assert_eq!(m.full_name(), "Ama Grace Kouassi");
        m.given_names.clear();
        assert_eq!(m.full_name(), "Kouassi");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = MemberPatch {
            surname: Some("Yao".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"nom":"Yao"}"#);
        assert!(!patch.is_empty());
        assert!(MemberPatch::default().is_empty());
    }

    #[test]
    fn test_patch_derives_qr_code_from_contact() {
        let patch = MemberPatch {
            contact: Some("05 44 33 22 11".to_string()),
            ..Default::default()
        }
        .with_derived_qr_code("+225");
        assert_eq!(patch.qr_code.as_deref(), Some("tel:+225544332211"));

        let explicit = MemberPatch {
            contact: Some("0544332211".to_string()),
            qr_code: Some("custom".to_string()),
            ..Default::default()
        }
        .with_derived_qr_code("+225");
        assert_eq!(explicit.qr_code.as_deref(), Some("custom"));
    }

    #[test]
    fn test_new_member_into_member() {
        let new = NewMember {
            surname: "Bamba".to_string(),
            given_names: "Issa".to_string(),
            contact: "0102030405".to_string(),
            ..Default::default()
        };
        let ts: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().unwrap();
        let m = new.into_member("member_1".to_string(), ts, "+225");
        assert_eq!(m.id, "member_1");
        assert_eq!(m.registered_at, ts);
        assert_eq!(m.qr_code, "tel:+225102030405");
    }

    #[test]
    fn test_sort_order_query() {
        assert_eq!(SortOrder::newest_first().as_query(), "dateInscription.desc");
        let asc = SortOrder {
            column: "nom",
            ascending: true,
        };
        assert_eq!(asc.as_query(), "nom.asc");
    }
}
