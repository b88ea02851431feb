//! In-memory records and the fixture data the mock backend starts with.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl UserRecord {
    /// The user as the backend exposes it: no password.
    pub fn public(&self) -> Value {
        json!({
            "_id": self.id,
            "name": format!("{} {}", self.first_name, self.last_name),
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "role": self.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub story_type: String,
    pub content: String,
    pub summary: Option<String>,
    pub monument: Option<String>,
    /// `draft`, `review`, `published` or `archived`.
    pub publish_status: String,
    pub statistics: Statistics,
}

impl Story {
    pub fn is_published(&self) -> bool {
        self.publish_status == "published"
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub views: u64,
    pub likes: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub short_description: Option<String>,
    pub location: Location,
}

/// Everything the mock backend stores.
#[derive(Debug, Default)]
pub struct Backend {
    pub users: Vec<UserRecord>,
    /// Bearer token -> user id.
    pub tokens: HashMap<String, String>,
    pub stories: BTreeMap<String, Story>,
    pub monuments: BTreeMap<String, Monument>,
}

impl Backend {
    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn user_by_token(&self, token: &str) -> Option<&UserRecord> {
        let id = self.tokens.get(token)?;
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn seeded() -> Self {
        let users = vec![
            UserRecord {
                id: "1".to_string(),
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: "admin@darshana.com".to_string(),
                password: "Admin123".to_string(),
                role: "admin".to_string(),
            },
            UserRecord {
                id: "2".to_string(),
                first_name: "Ajay".to_string(),
                last_name: "Tiwari".to_string(),
                email: "explorer@example.com".to_string(),
                password: "explorer123".to_string(),
                role: "user".to_string(),
            },
        ];

        let monuments = [
            Monument {
                id: "m1".to_string(),
                name: "Golden Temple".to_string(),
                description: "Harmandir Sahib, the holiest gurdwara of Sikhism.".to_string(),
                short_description: Some("Holiest gurdwara in Amritsar".to_string()),
                location: Location {
                    city: "Amritsar".to_string(),
                    state: "Punjab".to_string(),
                    country: "India".to_string(),
                },
            },
            Monument {
                id: "m2".to_string(),
                name: "Bhangarh Fort".to_string(),
                description: "A 17th century fort known for its legends of a curse.".to_string(),
                short_description: None,
                location: Location {
                    city: "Alwar".to_string(),
                    state: "Rajasthan".to_string(),
                    country: "India".to_string(),
                },
            },
        ];

        let stories = [
            story("s1", "History of the Golden Temple", "history", "m1", "published"),
            story("s2", "The Curse of Bhangarh", "horror", "m2", "published"),
            story("s3", "Myths of the Amrit Sarovar", "mythology", "m1", "review"),
        ];

        Self {
            users,
            tokens: HashMap::new(),
            stories: stories.into_iter().map(|s| (s.id.clone(), s)).collect(),
            monuments: monuments.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }
}

fn story(id: &str, title: &str, story_type: &str, monument: &str, publish_status: &str) -> Story {
    Story {
        id: id.to_string(),
        title: title.to_string(),
        story_type: story_type.to_string(),
        content: format!("{title}. A story told at the monument for generations."),
        summary: None,
        monument: Some(monument.to_string()),
        publish_status: publish_status.to_string(),
        statistics: Statistics::default(),
    }
}
