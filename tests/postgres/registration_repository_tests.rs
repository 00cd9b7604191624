//! Registration repository tests against both namespace tables.

use crate::postgres::helpers::{PostgresCluster, TestDatabase, postgres_cluster, test_runtime};
use papertrail::registration::{
    adapters::postgres::PostgresGuildRegistry,
    domain::{ChannelId, GuildId, GuildRegistration, RegistrationKind},
    ports::{GuildRegistrationRepository, RegistrationRepositoryError},
};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

struct RegistryContext {
    rt: Runtime,
    audit_log: PostgresGuildRegistry,
    message_log: PostgresGuildRegistry,
    _database: TestDatabase,
}

impl RegistryContext {
    const fn registry(&self, kind: RegistrationKind) -> &PostgresGuildRegistry {
        match kind {
            RegistrationKind::AuditLog => &self.audit_log,
            RegistrationKind::MessageLog => &self.message_log,
        }
    }
}

#[fixture]
fn registry_context(postgres_cluster: Option<PostgresCluster>) -> Option<RegistryContext> {
    let cluster = postgres_cluster?;
    let database = TestDatabase::create(cluster, "test_registrations").expect("database");
    let pool = database.pool(2).expect("pool");
    Some(RegistryContext {
        rt: test_runtime().expect("tokio runtime"),
        audit_log: PostgresGuildRegistry::new(pool.clone(), RegistrationKind::AuditLog),
        message_log: PostgresGuildRegistry::new(pool, RegistrationKind::MessageLog),
        _database: database,
    })
}

fn guild(value: i64) -> GuildId {
    GuildId::new(value).expect("valid guild id")
}

fn channel(value: i64) -> ChannelId {
    ChannelId::new(value).expect("valid channel id")
}

fn registration(guild_id: i64, channel_id: i64) -> GuildRegistration {
    GuildRegistration::new(guild(guild_id), channel(channel_id))
}

#[rstest]
#[case::audit_log(RegistrationKind::AuditLog)]
#[case::message_log(RegistrationKind::MessageLog)]
fn insert_then_find_round_trips(
    registry_context: Option<RegistryContext>,
    #[case] kind: RegistrationKind,
) {
    let Some(context) = registry_context else {
        return;
    };
    let registry = context.registry(kind);

    context.rt.block_on(async {
        assert!(!registry.exists(guild(123)).await.expect("exists"));
        registry
            .insert(&registration(123, 456))
            .await
            .expect("insert");

        assert!(registry.exists(guild(123)).await.expect("exists"));
        let found = registry
            .find_by_id(guild(123))
            .await
            .expect("find")
            .expect("row present");
        assert_eq!(found, registration(123, 456));
        assert_eq!(registry.find_by_id(guild(124)).await.expect("find"), None);
    });
}

#[rstest]
#[case::audit_log(RegistrationKind::AuditLog)]
#[case::message_log(RegistrationKind::MessageLog)]
fn unique_violations_name_the_conflicting_column(
    registry_context: Option<RegistryContext>,
    #[case] kind: RegistrationKind,
) {
    let Some(context) = registry_context else {
        return;
    };
    let registry = context.registry(kind);

    context.rt.block_on(async {
        registry
            .insert(&registration(5, 10))
            .await
            .expect("insert");

        let same_guild = registry.insert(&registration(5, 11)).await;
        assert!(matches!(
            same_guild,
            Err(RegistrationRepositoryError::DuplicateGuild(id)) if id == guild(5)
        ));

        let same_channel = registry.insert(&registration(6, 10)).await;
        assert!(matches!(
            same_channel,
            Err(RegistrationRepositoryError::DuplicateChannel(id)) if id == channel(10)
        ));
    });
}

#[rstest]
fn update_channel_enforces_uniqueness_and_existence(registry_context: Option<RegistryContext>) {
    let Some(context) = registry_context else {
        return;
    };
    let registry = context.registry(RegistrationKind::MessageLog);

    context.rt.block_on(async {
        registry.insert(&registration(5, 10)).await.expect("guild 5");
        registry.insert(&registration(6, 11)).await.expect("guild 6");

        let taken = registry.update_channel(guild(6), channel(10)).await;
        assert!(matches!(
            taken,
            Err(RegistrationRepositoryError::DuplicateChannel(id)) if id == channel(10)
        ));

        let missing = registry.update_channel(guild(404), channel(12)).await;
        assert!(matches!(
            missing,
            Err(RegistrationRepositoryError::NotFound(id)) if id == guild(404)
        ));

        registry
            .update_channel(guild(6), channel(12))
            .await
            .expect("free channel");
        let moved = registry
            .find_by_id(guild(6))
            .await
            .expect("find")
            .expect("row present");
        assert_eq!(moved.channel_id(), channel(12));
    });
}

#[rstest]
fn delete_reports_whether_a_row_went(registry_context: Option<RegistryContext>) {
    let Some(context) = registry_context else {
        return;
    };
    let registry = context.registry(RegistrationKind::AuditLog);

    context.rt.block_on(async {
        registry.insert(&registration(8, 80)).await.expect("insert");

        assert!(registry.delete_by_id(guild(8)).await.expect("delete"));
        assert!(!registry.delete_by_id(guild(8)).await.expect("second delete"));
        registry
            .insert(&registration(9, 80))
            .await
            .expect("channel free again");
    });
}

#[rstest]
fn namespaces_do_not_share_rows_or_channels(registry_context: Option<RegistryContext>) {
    let Some(context) = registry_context else {
        return;
    };

    context.rt.block_on(async {
        context
            .audit_log
            .insert(&registration(1, 100))
            .await
            .expect("audit log");
        context
            .message_log
            .insert(&registration(2, 100))
            .await
            .expect("same channel in the other table");

        assert!(!context.message_log.exists(guild(1)).await.expect("exists"));
        assert!(!context.audit_log.exists(guild(2)).await.expect("exists"));
        assert_eq!(context.audit_log.kind(), RegistrationKind::AuditLog);
        assert_eq!(context.message_log.kind(), RegistrationKind::MessageLog);
    });
}
