//! Customer repository for database operations

use crate::db::models::{Contact, Customer};
use crate::db::now_timestamp;
use sqlx::{Executor, Sqlite};

/// Customer repository for managing customers and their contacts
pub struct CustomerRepository;

impl CustomerRepository {
    /// Insert a customer
    pub async fn create<'c, E>(executor: E, customer: &Customer) -> Result<Customer, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, name, email, phone, customer_type, company_name, state, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.customer_type)
        .bind(&customer.company_name)
        .bind(&customer.state)
        .bind(&customer.created_at)
        .bind(&customer.updated_at)
        .fetch_one(executor)
        .await
    }

    /// Get a customer by ID
    pub async fn get_by_id<'c, E>(executor: E, id: &str) -> Result<Option<Customer>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Get a customer by email (case-insensitive)
    pub async fn get_by_email<'c, E>(executor: E, email: &str) -> Result<Option<Customer>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE lower(email) = lower(?)")
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// List all customers, newest first
    pub async fn list<'c, E>(executor: E) -> Result<Vec<Customer>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at DESC, name")
            .fetch_all(executor)
            .await
    }

    /// Overwrite the mutable columns of a customer
    pub async fn update<'c, E>(executor: E, customer: &Customer) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE customers SET name = ?, email = ?, phone = ?, customer_type = ?, company_name = ?,
                                  state = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.customer_type)
        .bind(&customer.company_name)
        .bind(&customer.state)
        .bind(now_timestamp())
        .bind(&customer.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a customer
    pub async fn delete<'c, E>(executor: E, id: &str) -> Result<u64, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Add a contact to a customer
    pub async fn create_contact<'c, E>(executor: E, contact: &Contact) -> Result<Contact, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Contact>(
            "INSERT INTO contacts (id, customer_id, name, email, phone, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&contact.id)
        .bind(&contact.customer_id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.role)
        .bind(&contact.created_at)
        .fetch_one(executor)
        .await
    }

    /// List contacts of a customer
    pub async fn list_contacts<'c, E>(executor: E, customer_id: &str) -> Result<Vec<Contact>, sqlx::Error>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE customer_id = ? ORDER BY name",
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await
    }
}
