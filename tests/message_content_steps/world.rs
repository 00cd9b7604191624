//! Shared world state for message content BDD scenarios.

use std::num::NonZeroUsize;
use std::sync::Arc;

use mockable::DefaultClock;
use papertrail::cache::{RecordCache, adapters::LruRecordCache};
use papertrail::content::{
    adapters::memory::InMemoryMessageContentRepository,
    domain::{AuthorId, MessageContentRecord, MessageId, MessageText, NewMessageContent},
    ports::ContentServiceError,
    services::{LockingMessageContentService, MessageContentService},
};
use papertrail::lock::adapters::LocalLockManager;
use rstest::fixture;

/// Locked content service used by the scenarios.
pub type ScenarioService = LockingMessageContentService<
    MessageContentService<InMemoryMessageContentRepository, DefaultClock>,
    LocalLockManager,
>;

/// Scenario world for message content behaviour tests.
pub struct ContentWorld {
    /// The service under test.
    pub service: ScenarioService,
    /// Repository shared with the service and the sweeper.
    pub repository: Arc<InMemoryMessageContentRepository>,
    /// Content cache shared with the service and the sweeper.
    pub cache: Arc<dyn RecordCache<MessageContentRecord>>,
    /// Error returned by the last operation, if it failed.
    pub last_error: Option<ContentServiceError>,
    /// Number of records removed by the last sweep.
    pub last_swept: Option<u64>,
}

impl ContentWorld {
    /// Creates a world over an empty archive.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryMessageContentRepository::new());
        let cache: Arc<dyn RecordCache<MessageContentRecord>> = Arc::new(LruRecordCache::new(
            "messageContent",
            NonZeroUsize::new(64).expect("non-zero capacity"),
        ));
        let inner = MessageContentService::new(
            Arc::clone(&repository),
            Arc::clone(&cache),
            Arc::new(DefaultClock),
        );
        Self {
            service: LockingMessageContentService::new(
                Arc::new(inner),
                Arc::new(LocalLockManager::default()),
            ),
            repository,
            cache,
            last_error: None,
            last_swept: None,
        }
    }

    /// Records the outcome of an operation.
    pub fn record<T>(&mut self, result: Result<T, ContentServiceError>) {
        self.last_error = result.err();
    }
}

impl Default for ContentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ContentWorld {
    ContentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a message id from step text.
pub fn message_id(id: i64) -> Result<MessageId, eyre::Report> {
    MessageId::new(id).map_err(|err| eyre::eyre!("invalid message id {id}: {err}"))
}

/// Builds a content payload from step text.
pub fn payload(id: i64, text: String, author: i64) -> Result<NewMessageContent, eyre::Report> {
    Ok(NewMessageContent {
        message_id: message_id(id)?,
        content: MessageText::new(text).map_err(|err| eyre::eyre!("invalid text: {err}"))?,
        author_id: AuthorId::new(author).map_err(|err| eyre::eyre!("invalid author: {err}"))?,
    })
}
