//! Declarative test builder.
//!
//! Collects tables, seed data and mock endpoints, then applies all of them in `build()`.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestSetup};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_user_tables: bool,
    include_work_tables: bool,

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_user_tables: false,
            include_work_tables: false,
            mock_builders: Vec::new(),
        }
    }

    /// Add the role and user tables, seeded with the default roles.
    pub fn with_user_tables(mut self) -> Self {
        self.include_user_tables = true;
        self
    }

    /// Add every application table, seeded with the default roles and tasks.
    pub fn with_work_tables(mut self) -> Self {
        self.include_work_tables = true;
        self
    }

    /// Add a custom entity table to the test database.
    ///
    /// ```no_run
    /// use cleancare_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), cleancare_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(Role)
    ///     .with_table(User)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Register a mock endpoint on the test HTTP server.
    ///
    /// The closure receives the server and returns the created mock so it can be
    /// asserted with [`TestSetup::assert_mocks`].
    pub fn with_mock_endpoint<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(builder));
        self
    }

    pub async fn build(self) -> Result<TestSetup, TestError> {
        let mut setup = TestSetup::new().await?;

        let mut all_tables = Vec::new();
        if self.include_user_tables && !self.include_work_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend([
                schema.create_table_from_entity(entity::prelude::Role),
                schema.create_table_from_entity(entity::prelude::User),
            ]);
        }
        if self.include_work_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend([
                schema.create_table_from_entity(entity::prelude::Role),
                schema.create_table_from_entity(entity::prelude::User),
                schema.create_table_from_entity(entity::prelude::Task),
                schema.create_table_from_entity(entity::prelude::TaskType),
                schema.create_table_from_entity(entity::prelude::Work),
                schema.create_table_from_entity(entity::prelude::Comment),
            ]);
        }
        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        if self.include_user_tables || self.include_work_tables {
            setup.user().insert_roles().await?;
        }
        if self.include_work_tables {
            setup.work().insert_tasks().await?;
        }

        let mut mocks = Vec::new();
        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }
        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
