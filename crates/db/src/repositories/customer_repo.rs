//! Read-only lookups against the external customer directory mirror.

use sqlx::PgPool;

use crate::models::customer::CustomerRecord;

/// Resolves (customer_number, country) identities. This table is populated
/// by an external sync job; the application never writes to it.
pub struct CustomerDirectoryRepo;

impl CustomerDirectoryRepo {
    /// Resolve a customer identity, returning the directory record if known.
    pub async fn find(
        pool: &PgPool,
        customer_number: &str,
        country: &str,
    ) -> Result<Option<CustomerRecord>, sqlx::Error> {
        sqlx::query_as::<_, CustomerRecord>(
            "SELECT id, customer_number, country, name \
             FROM customers WHERE customer_number = $1 AND country = $2",
        )
        .bind(customer_number)
        .bind(country)
        .fetch_optional(pool)
        .await
    }
}
