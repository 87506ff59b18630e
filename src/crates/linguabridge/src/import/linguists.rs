//! Linguist import

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::columns::{split_languages, Column, ColumnMap};
use super::{reader, Delimiter, ImportError, ImportSummary};
use crate::db::models::{Linguist, LinguistLanguage};
use crate::db::repositories::{LanguageRepository, LinguistRepository};
use crate::db::DatabasePool;

const COLUMNS: &[Column] = &[
    Column { field: "first_name", aliases: &["firstname", "first", "givenname"] },
    Column { field: "last_name", aliases: &["lastname", "last", "surname", "familyname"] },
    Column { field: "name", aliases: &["name", "fullname", "linguist", "linguistname"] },
    Column { field: "email", aliases: &["email", "emailaddress", "mail"] },
    Column { field: "phone", aliases: &["phone", "phonenumber", "mobile", "cell"] },
    Column { field: "city", aliases: &["city", "town"] },
    Column { field: "state", aliases: &["state", "province", "region"] },
    Column { field: "latitude", aliases: &["latitude", "lat"] },
    Column { field: "longitude", aliases: &["longitude", "lng", "lon", "long"] },
    Column {
        field: "max_travel_distance",
        aliases: &["maxtraveldistance", "maxtravel", "traveldistance", "travelradius", "maxmiles"],
    },
    Column { field: "available_onsite", aliases: &["availableonsite", "onsite", "inperson"] },
    Column { field: "available_video", aliases: &["availablevideo", "video", "vri"] },
    Column { field: "available_phone", aliases: &["availablephone", "opi", "overthephone"] },
    Column { field: "hourly_rate", aliases: &["hourlyrate", "rateperhour", "hourly"] },
    Column { field: "per_word_rate", aliases: &["perwordrate", "wordrate", "rateperword"] },
    Column { field: "active", aliases: &["active", "isactive", "enabled"] },
    Column {
        field: "languages",
        aliases: &["languages", "translationlanguages", "translates"],
    },
    Column {
        field: "interpreting_languages",
        aliases: &["interpretinglanguages", "interpretationlanguages", "interprets"],
    },
];

/// Language code lookup by code or display name, case-insensitive
struct LanguageLookup {
    codes: HashMap<String, String>,
}

impl LanguageLookup {
    async fn load(pool: &DatabasePool) -> Result<Self, sqlx::Error> {
        let mut codes = HashMap::new();
        for language in LanguageRepository::list(pool).await? {
            codes.insert(language.name.to_lowercase(), language.code.clone());
            codes.insert(language.code.to_lowercase(), language.code);
        }
        Ok(Self { codes })
    }

    fn resolve(&self, value: &str) -> Option<&str> {
        self.codes.get(&value.trim().to_lowercase()).map(String::as_str)
    }
}

/// Required fields present, or why the row is skipped
fn names(map: &ColumnMap, record: &StringRecord) -> Option<(String, String)> {
    match (map.get(record, "first_name"), map.get(record, "last_name")) {
        (Some(first), Some(last)) => Some((first.to_string(), last.to_string())),
        _ => {
            let full = map.get(record, "name")?;
            let (first, last) = full.rsplit_once(' ')?;
            Some((first.trim().to_string(), last.trim().to_string()))
        }
    }
}

fn build_linguist(map: &ColumnMap, record: &StringRecord) -> Option<Linguist> {
    let (first_name, last_name) = names(map, record)?;
    let email = map.get(record, "email").filter(|e| e.contains('@'))?;

    let mut linguist = Linguist::new(
        Uuid::new_v4().to_string(),
        first_name,
        last_name,
        email.to_ascii_lowercase(),
    );
    linguist.phone = map.get_string(record, "phone");
    linguist.city = map.get_string(record, "city");
    linguist.state = map.get(record, "state").map(str::to_ascii_uppercase);

    if let (Some(lat), Some(lon)) = (map.get_f64(record, "latitude"), map.get_f64(record, "longitude")) {
        linguist.latitude = Some(lat);
        linguist.longitude = Some(lon);
    }
    linguist.max_travel_distance = map.get_f64(record, "max_travel_distance");
    linguist.available_onsite = map.get_bool(record, "available_onsite").unwrap_or(false);
    linguist.available_video = map.get_bool(record, "available_video").unwrap_or(false);
    linguist.available_phone = map.get_bool(record, "available_phone").unwrap_or(false);
    linguist.hourly_rate = map.get_f64(record, "hourly_rate");
    linguist.per_word_rate = map.get_f64(record, "per_word_rate");
    linguist.active = map.get_bool(record, "active").unwrap_or(true);
    Some(linguist)
}

fn language_tags(
    map: &ColumnMap,
    record: &StringRecord,
    lookup: &LanguageLookup,
    linguist_id: &str,
) -> Vec<LinguistLanguage> {
    let mut tags = Vec::new();
    for (field, service) in [("languages", "translation"), ("interpreting_languages", "interpretation")] {
        let Some(cell) = map.get(record, field) else {
            continue;
        };
        for value in split_languages(cell) {
            match lookup.resolve(&value) {
                Some(code) => tags.push(LinguistLanguage {
                    linguist_id: linguist_id.to_string(),
                    language_code: code.to_string(),
                    service: service.to_string(),
                }),
                None => warn!("Unknown language {:?} for linguist {}", value, linguist_id),
            }
        }
    }
    tags
}

async fn insert(pool: &DatabasePool, linguist: &Linguist, tags: &[LinguistLanguage]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    LinguistRepository::create(&mut *tx, linguist).await?;
    LinguistRepository::set_languages(&mut tx, &linguist.id, tags).await?;
    tx.commit().await
}

/// Import linguists from a TSV/CSV export
pub async fn import_linguists<R: Read>(
    pool: &DatabasePool,
    input: R,
    delimiter: Delimiter,
) -> Result<ImportSummary, ImportError> {
    let mut rdr = reader(input, delimiter);
    let map = ColumnMap::new(rdr.headers()?, COLUMNS);
    if !map.has("email") {
        return Err(ImportError::MissingColumn("email"));
    }
    if !(map.has("first_name") && map.has("last_name")) && !map.has("name") {
        return Err(ImportError::MissingColumn("first_name/last_name"));
    }

    let lookup = LanguageLookup::load(pool).await?;
    let mut summary = ImportSummary::default();

    for (line, result) in rdr.records().enumerate() {
        let row = line + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {}: unreadable, skipping: {}", row, e);
                summary.skipped += 1;
                continue;
            }
        };

        let Some(linguist) = build_linguist(&map, &record) else {
            debug!("Row {}: missing name or email, skipping", row);
            summary.skipped += 1;
            continue;
        };
        let tags = language_tags(&map, &record, &lookup, &linguist.id);

        match insert(pool, &linguist, &tags).await {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!("Row {}: could not import {}: {}", row, linguist.email, e);
                summary.failed += 1;
            }
        }
    }

    info!("Linguist import: {}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;
    use std::io::Write;

    const EXPORT: &str = "First Name\tLast Name\tE-mail\tCity\tState\tLat\tLng\tMax Travel\tOnsite\tVRI\tOPI\tLanguages\tInterpreting Languages\n\
Marie\tJoseph\tmarie@example.com\tMiami\tfl\t25.77\t-80.19\t40 mi\tyes\tno\tyes\tEnglish, French\tHaitian Creole; English\n\
\tNoname\tnobody@example.com\t\t\t\t\t\t\t\t\t\t\n\
Carlos\tRuiz\tMARIE@example.com\tTampa\tFL\t\t\t\t\tyes\t\t\tSpanish | en | Klingon\n\
Ana\tSilva\tana@example.com\tOrlando\tFL\t\t\t\tno\tyes\tyes\tPortuguese\tpt;en\n";

    #[tokio::test]
    async fn test_import_linguists_counts_rows() {
        let conn = DatabaseConnection::in_memory().await.unwrap();
        let pool = conn.pool();

        let summary = import_linguists(pool, EXPORT.as_bytes(), Delimiter::Tab)
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 1,
                failed: 1,
            }
        );

        let marie = LinguistRepository::get_by_email(pool, "marie@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(marie.state.as_deref(), Some("FL"));
        assert_eq!(marie.coordinates(), Some((25.77, -80.19)));
        assert_eq!(marie.max_travel_distance, Some(40.0));
        assert!(marie.available_onsite);
        assert!(!marie.available_video);

        let tags = LinguistRepository::languages_for(pool, &marie.id).await.unwrap();
        let interpretation: Vec<_> = tags
            .iter()
            .filter(|t| t.service == "interpretation")
            .map(|t| t.language_code.as_str())
            .collect();
        assert_eq!(interpretation, vec!["en", "ht"]);
        assert_eq!(tags.iter().filter(|t| t.service == "translation").count(), 2);
    }

    #[tokio::test]
    async fn test_import_linguists_from_csv_file() {
        let conn = DatabaseConnection::in_memory().await.unwrap();

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,email,video,interpreting languages").unwrap();
        writeln!(file, "Li Wei,li@example.com,y,\"zh,en\"").unwrap();
        writeln!(file, "Cher,cher@example.com,y,en").unwrap();
        file.flush().unwrap();

        let delimiter = Delimiter::from_path(file.path());
        let summary = super::super::import_file(
            conn.pool(),
            super::super::ImportKind::Linguists,
            file.path(),
            delimiter,
        )
        .await
        .unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 1);

        let li = LinguistRepository::get_by_email(conn.pool(), "li@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(li.first_name, "Li");
        assert_eq!(li.last_name, "Wei");
        assert!(li.available_video);
    }

    #[tokio::test]
    async fn test_import_requires_email_column() {
        let conn = DatabaseConnection::in_memory().await.unwrap();
        let err = import_linguists(conn.pool(), "first,last\nA,B\n".as_bytes(), Delimiter::Comma)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn("email")));
    }
}
