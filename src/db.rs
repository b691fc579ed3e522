use crate::config::DatabaseConfig;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::user::UserStore;
use rocket::fairing::AdHoc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

async fn init_pool(db_config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout))
        .idle_timeout(Duration::from_secs(30))
        .max_lifetime(Duration::from_secs(1800));

    if db_config.lazy_connect {
        options.connect_lazy(&db_config.url)
    } else {
        options.connect(&db_config.url).await
    }
}

pub fn stage_db(db_config: DatabaseConfig) -> AdHoc {
    AdHoc::try_on_ignite("Postgres (sqlx)", |rocket| async move {
        match init_pool(&db_config).await {
            Ok(pool) => {
                tracing::info!(lazy = db_config.lazy_connect, "Database pool initialized successfully");
                let rocket = rocket.manage(pool.clone());

                // A user store managed before ignition wins over the pool-backed one.
                if rocket.state::<UserStore>().is_some() {
                    return Ok(rocket);
                }
                let users: UserStore = Arc::new(PostgresRepository { pool });
                Ok(rocket.manage(users))
            }
            Err(e) => {
                tracing::error!("Failed to initialize database pool: {}", e);
                Err(rocket)
            }
        }
    })
}
