use crate::{
    config::{RuntimeConfiguration, StoreConfig},
    data::{StudentRepository, memory::MemoryStudentRepository, postgres::PgStudentRepository},
    error::RosterResult,
    service::StudentService,
};
use maud::{DOCTYPE, Markup, html};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct RosterState {
    students: StudentService,
}

impl RosterState {
    pub async fn new(config: &RuntimeConfiguration) -> RosterResult<Self> {
        let repository: Arc<dyn StudentRepository> = match config.store() {
            StoreConfig::Postgres(db_config) => {
                let options = PgPoolOptions::new().max_connections(db_config.max_connections());
                Arc::new(PgStudentRepository::connect(options, &db_config.get_db_path()).await?)
            }
            StoreConfig::Memory => {
                warn!("Using the in-memory store, nothing will survive a restart");
                Arc::new(MemoryStudentRepository::new())
            }
        };

        Ok(Self::with_repository(repository))
    }

    pub fn with_repository(repository: Arc<dyn StudentRepository>) -> Self {
        Self {
            students: StudentService::new(repository),
        }
    }

    pub const fn students(&self) -> &StudentService {
        &self.students
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Roster" }
                }
                body class="bg-gray-900 h-screen flex flex-col items-center justify-center text-white" {
                    (markup)
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) {
        self.students.shutdown().await;
    }
}
