//! Customer import

use std::io::Read;

use csv::StringRecord;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::columns::{Column, ColumnMap};
use super::{reader, Delimiter, ImportError, ImportSummary};
use crate::db::models::Customer;
use crate::db::repositories::CustomerRepository;
use crate::db::DatabasePool;

const COLUMNS: &[Column] = &[
    Column { field: "name", aliases: &["name", "customername", "fullname", "contactname", "client"] },
    Column { field: "first_name", aliases: &["firstname", "first", "givenname"] },
    Column { field: "last_name", aliases: &["lastname", "last", "surname"] },
    Column { field: "email", aliases: &["email", "emailaddress", "mail"] },
    Column { field: "phone", aliases: &["phone", "phonenumber", "mobile", "telephone"] },
    Column { field: "customer_type", aliases: &["customertype", "type", "accounttype"] },
    Column {
        field: "company_name",
        aliases: &["companyname", "company", "organization", "organisation", "business"],
    },
    Column { field: "state", aliases: &["state", "province", "region"] },
];

fn customer_name(map: &ColumnMap, record: &StringRecord) -> Option<String> {
    if let Some(name) = map.get(record, "name") {
        return Some(name.to_string());
    }
    match (map.get(record, "first_name"), map.get(record, "last_name")) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Legacy type labels vary; a company name implies a corporate account
fn customer_type(map: &ColumnMap, record: &StringRecord) -> &'static str {
    match map.get(record, "customer_type").map(str::to_ascii_lowercase).as_deref() {
        Some("corporate" | "business" | "company" | "b2b") => "corporate",
        Some(_) => "individual",
        None if map.get(record, "company_name").is_some() => "corporate",
        None => "individual",
    }
}

fn build_customer(map: &ColumnMap, record: &StringRecord) -> Option<Customer> {
    let name = customer_name(map, record)?;
    let email = map.get(record, "email").filter(|e| e.contains('@'))?;

    let mut customer = Customer::new(Uuid::new_v4().to_string(), name, email.to_ascii_lowercase());
    customer.phone = map.get_string(record, "phone");
    customer.customer_type = customer_type(map, record).to_string();
    customer.company_name = map.get_string(record, "company_name");
    customer.state = map.get(record, "state").map(str::to_ascii_uppercase);
    Some(customer)
}

/// Import customers from a TSV/CSV export
pub async fn import_customers<R: Read>(
    pool: &DatabasePool,
    input: R,
    delimiter: Delimiter,
) -> Result<ImportSummary, ImportError> {
    let mut rdr = reader(input, delimiter);
    let map = ColumnMap::new(rdr.headers()?, COLUMNS);
    if !map.has("email") {
        return Err(ImportError::MissingColumn("email"));
    }

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

        let Some(customer) = build_customer(&map, &record) else {
            debug!("Row {}: missing name or email, skipping", row);
            summary.skipped += 1;
            continue;
        };

        match CustomerRepository::create(pool, &customer).await {
            Ok(_) => summary.imported += 1,
            Err(e) => {
                warn!("Row {}: could not import {}: {}", row, customer.email, e);
                summary.failed += 1;
            }
        }
    }

    info!("Customer import: {}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    #[tokio::test]
    async fn test_import_customers() {
        let conn = DatabaseConnection::in_memory().await.unwrap();
        let pool = conn.pool();

        let export = "First Name,Last Name,Email Address,Company,State\n\
                      Jane,Doe,jane@example.com,,ny\n\
                      Legal,Dept,legal@firm.test,Firm LLP,FL\n\
                      ,,orphan@example.com,,\n\
                      John,Roe,not-an-email,,\n\
                      Janet,Doe,JANE@example.com,,\n";

        let summary = import_customers(pool, export.as_bytes(), Delimiter::Comma)
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 2,
                failed: 1,
            }
        );

        let jane = CustomerRepository::get_by_email(pool, "jane@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.customer_type, "individual");
        assert_eq!(jane.state.as_deref(), Some("NY"));

        let firm = CustomerRepository::get_by_email(pool, "legal@firm.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(firm.customer_type, "corporate");
        assert_eq!(firm.company_name.as_deref(), Some("Firm LLP"));
    }
}
