use serde::{Deserialize, Serialize};

// One row of the active session, as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub id: String,
    pub seq: i64,
    pub name: String,
    pub category: String,
    pub gender: Option<String>,
    pub confirmed_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "mensalista")]
    Monthly,
    #[serde(alias = "avulso")]
    Casual,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Monthly => "monthly",
            Category::Casual => "casual",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "monthly" | "mensalista" => Some(Category::Monthly),
            "casual" | "avulso" => Some(Category::Casual),
            _ => None,
        }
    }
}

/// Gender used for team balancing. Absent or unknown stored values read as `Male`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "feminino")]
    Female,
    #[default]
    #[serde(alias = "masculino")]
    Male,
}

impl Gender {
    /// Fixed balancing order. On equal remaining counts the earlier group deals first.
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "female" | "feminino" => Some(Gender::Female),
            "male" | "masculino" => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(Gender::parse).unwrap_or_default()
    }
}

/// Uniqueness key for a display name: trimmed and Unicode-lowercased.
/// SQLite's `lower()` folds ASCII only, so the key is computed here.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub gender: Gender,
    pub confirmed_at: String,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        let category = Category::parse(&row.category).unwrap_or_else(|| {
            tracing::warn!(id = %row.id, category = %row.category, "unknown stored category");
            Category::Casual
        });
        Participant {
            gender: Gender::from_stored(row.gender.as_deref()),
            id: row.id,
            name: row.name,
            category,
            confirmed_at: row.confirmed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gender: Option<&str>) -> ParticipantRow {
        ParticipantRow {
            id: "p1".to_string(),
            seq: 1,
            name: "Ana".to_string(),
            category: "mensalista".to_string(),
            gender: gender.map(str::to_string),
            confirmed_at: "2026-01-16T21:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn missing_gender_reads_as_male() {
        assert_eq!(Participant::from(row(None)).gender, Gender::Male);
        assert_eq!(Participant::from(row(Some(""))).gender, Gender::Male);
        assert_eq!(Participant::from(row(Some("feminino"))).gender, Gender::Female);
    }

    #[test]
    fn legacy_labels_are_accepted() {
        assert_eq!(Category::parse(" Avulso "), Some(Category::Casual));
        assert_eq!(Category::parse("monthly"), Some(Category::Monthly));
        assert_eq!(Category::parse("weekly"), None);
        assert_eq!(Participant::from(row(None)).category, Category::Monthly);

        let g: Gender = serde_json::from_str("\"masculino\"").unwrap();
        assert_eq!(g, Gender::Male);
    }

    #[test]
    fn name_key_folds_accented_letters() {
        assert_eq!(name_key(" JOÃO "), "joão");
        assert_eq!(name_key("João"), name_key("joÃo"));
        assert_eq!(name_key("ÉDER"), "éder");
        assert_ne!(name_key("Joao"), name_key("João"));
    }
}
