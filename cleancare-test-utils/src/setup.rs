use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::error::TestError;

/// In-memory database plus a mock HTTP server for drive and mail endpoints.
pub struct TestSetup {
    pub server: ServerGuard,
    pub db: DatabaseConnection,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;
        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestSetup {
            server: mock_server,
            db,
            mocks: Vec::new(),
        })
    }

    /// Base URL of the mock HTTP server
    pub fn mock_url(&self) -> String {
        self.server.url()
    }

    pub async fn with_tables(&self, stmts: Vec<TableCreateStatement>) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        TestSetup::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

/// Creates the role and user tables and seeds both roles.
#[macro_export]
macro_rules! test_setup_with_user_tables {
    () => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                schema.create_table_from_entity(entity::prelude::Role),
                schema.create_table_from_entity(entity::prelude::User),
            ];
            setup.with_tables(stmts).await?;
            setup.user().insert_roles().await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

/// Creates every table and seeds roles and tasks.
#[macro_export]
macro_rules! test_setup_with_work_tables {
    () => {{
        async {
            let setup = TestSetup::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                schema.create_table_from_entity(entity::prelude::Role),
                schema.create_table_from_entity(entity::prelude::User),
                schema.create_table_from_entity(entity::prelude::Task),
                schema.create_table_from_entity(entity::prelude::TaskType),
                schema.create_table_from_entity(entity::prelude::Work),
                schema.create_table_from_entity(entity::prelude::Comment),
            ];
            setup.with_tables(stmts).await?;
            setup.user().insert_roles().await?;
            setup.work().insert_tasks().await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}
