//! ConversationEngine - the per-chat registration state machine.
//!
//! Each inbound event is one unit of work:
//!
//! 1. The actor is checked against the access list. Rejected actors get a
//!    fixed reply and never touch the session store.
//! 2. The chat's session slot is locked for the rest of the unit, so
//!    overlapping events for one chat apply strictly in order.
//! 3. `(state, event)` selects a step. Pairs with no transition are ignored.
//! 4. Recoverable failures fall back to the next manual step inside the
//!    step itself. Anything else escapes to [`ConversationEngine::handle`],
//!    which clears the session and replies with the failure message.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::domain::conversation::{
    copy, Collaborator, ConversationState, EventKind, ImageRef, InboundEvent, MethodChoice,
    OutboundMessage, RecognitionStage, Session, WorkflowError,
};
use crate::domain::expiry::{DateNormalizer, ExpirationDate};
use crate::domain::foundation::{AccessList, ChatId, ValidationError};
use crate::domain::product::Product;
use crate::ports::{
    BarcodeDecoder, BarcodeError, MessagingError, MessagingGateway, RecognitionError,
    RecognitionOptions, TextRecognizer,
};

use super::product_resolver::{ProductLookup, ProductResolver};
use super::reminder_scheduler::{ReminderScheduler, SchedulingError};
use super::scoped_image::ScopedImage;
use super::session_store::{SessionSlot, SessionStore};

/// Runtime knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Bound on every external call made directly by the engine.
    pub call_timeout: Duration,
    /// Directory for downloaded images.
    pub temp_dir: PathBuf,
    pub recognition: RecognitionOptions,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            temp_dir: std::env::temp_dir(),
            recognition: RecognitionOptions::default(),
        }
    }
}

/// Collaborators the engine talks to.
pub struct EngineCollaborators {
    pub messaging: Arc<dyn MessagingGateway>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub decoder: Arc<dyn BarcodeDecoder>,
    pub products: ProductResolver,
    pub scheduler: ReminderScheduler,
}

/// Drives every chat's registration flow.
pub struct ConversationEngine {
    messaging: Arc<dyn MessagingGateway>,
    recognizer: Arc<dyn TextRecognizer>,
    decoder: Arc<dyn BarcodeDecoder>,
    products: ProductResolver,
    scheduler: ReminderScheduler,
    sessions: SessionStore,
    access: AccessList,
    dates: DateNormalizer,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(
        collaborators: EngineCollaborators,
        access: AccessList,
        settings: EngineSettings,
    ) -> Self {
        Self {
            messaging: collaborators.messaging,
            recognizer: collaborators.recognizer,
            decoder: collaborators.decoder,
            products: collaborators.products,
            scheduler: collaborators.scheduler,
            sessions: SessionStore::new(),
            access,
            dates: DateNormalizer::new(),
            settings,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one inbound event to completion. Never fails; every error
    /// becomes a reply plus a log line.
    pub async fn handle(&self, event: InboundEvent) {
        let span = tracing::info_span!(
            "event",
            correlation_id = %Uuid::new_v4(),
            chat_id = event.chat.value(),
            actor_id = event.actor.value(),
            kind = event.kind.label(),
        );
        self.process(event).instrument(span).await
    }

    async fn process(&self, event: InboundEvent) {
        let InboundEvent { chat, actor, kind } = event;

        if !self.access.permits(actor) {
            let denied = WorkflowError::AuthorizationDenied { actor };
            tracing::warn!(error = %denied, "Rejected event");
            self.reply(chat, OutboundMessage::text(denied.user_message()))
                .await;
            return;
        }

        let mut slot = self.sessions.acquire(chat).await;
        let before = slot.state();

        match self.step(&mut slot, kind).await {
            Ok(()) => {
                tracing::debug!(from = %before, to = %slot.state(), "Event applied");
            }
            Err(err) => {
                match &err {
                    WorkflowError::CollaboratorFailure { .. } => {
                        tracing::error!(state = %before, error = %err, "Unit of work failed")
                    }
                    _ => tracing::warn!(
                        state = %before,
                        error = %err,
                        recoverable = err.is_recoverable(),
                        "Unit of work failed"
                    ),
                }
                slot.clear();
                self.reply(chat, OutboundMessage::text(err.user_message()))
                    .await;
            }
        }
    }

    async fn step(&self, slot: &mut SessionSlot, kind: EventKind) -> Result<(), WorkflowError> {
        use ConversationState as S;

        match (slot.state(), kind) {
            (_, EventKind::Start) => self.choose_method(slot).await,
            (S::ChoosingMethod, EventKind::Choice(choice)) => {
                self.accept_choice(slot, choice).await
            }
            (S::AwaitingNameManual, EventKind::Text(text)) => self.accept_name(slot, &text).await,
            (S::AwaitingDateManual, EventKind::Text(text)) => {
                self.accept_manual_date(slot, &text).await
            }
            (S::AwaitingBarcodeImage, EventKind::Image(image)) => {
                self.accept_barcode_image(slot, &image).await
            }
            (S::AwaitingExpirationImage, EventKind::Image(image)) => {
                self.accept_expiration_image(slot, &image).await
            }
            (state, kind) => {
                tracing::debug!(
                    %state,
                    kind = kind.label(),
                    takes_text = state.accepts_text(),
                    takes_image = state.accepts_image(),
                    takes_choice = state.accepts_choice(),
                    "No transition for event; ignored"
                );
                Ok(())
            }
        }
    }

    /// `/start` from any state discards what was in flight.
    async fn choose_method(&self, slot: &mut SessionSlot) -> Result<(), WorkflowError> {
        if slot.session().is_some() {
            tracing::info!(abandoned = %slot.state(), "Restarting registration");
        }
        slot.replace(Session::start(slot.chat()));
        self.reply(slot.chat(), OutboundMessage::method_choice())
            .await;
        Ok(())
    }

    async fn accept_choice(
        &self,
        slot: &mut SessionSlot,
        choice: MethodChoice,
    ) -> Result<(), WorkflowError> {
        let (target, prompt) = match choice {
            MethodChoice::Manual => (ConversationState::AwaitingNameManual, copy::ASK_NAME),
            MethodChoice::Photo => (
                ConversationState::AwaitingBarcodeImage,
                copy::ASK_BARCODE_IMAGE,
            ),
        };
        slot.advance(target)?;
        self.reply(slot.chat(), OutboundMessage::text(prompt)).await;
        Ok(())
    }

    async fn accept_name(&self, slot: &mut SessionSlot, text: &str) -> Result<(), WorkflowError> {
        let product = match Product::named(text) {
            Ok(product) => product,
            Err(e) => {
                tracing::debug!(error = %e, "Blank product name; prompting again");
                self.reply(slot.chat(), OutboundMessage::text(copy::ASK_NAME))
                    .await;
                return Ok(());
            }
        };

        slot.advance_with_product(product, ConversationState::AwaitingDateManual)?;
        self.reply(slot.chat(), OutboundMessage::text(copy::NAME_REGISTERED))
            .await;
        Ok(())
    }

    async fn accept_manual_date(
        &self,
        slot: &mut SessionSlot,
        text: &str,
    ) -> Result<(), WorkflowError> {
        match self.dates.parse_manual(text) {
            Ok(date) => {
                self.reply(
                    slot.chat(),
                    OutboundMessage::text(copy::date_registered(date.as_str())),
                )
                .await;
                self.complete(slot, date).await
            }
            Err(e) => {
                self.recover(
                    slot,
                    WorkflowError::ValidationFailure(e),
                    ConversationState::AwaitingDateManual,
                )
                .await
            }
        }
    }

    async fn accept_barcode_image(
        &self,
        slot: &mut SessionSlot,
        image: &ImageRef,
    ) -> Result<(), WorkflowError> {
        let file = self.download(image).await?;
        let decoded = self
            .bounded(self.decoder.decode(file.path()), |secs| {
                BarcodeError::Timeout { timeout_secs: secs }
            })
            .await;
        release(file);

        let barcode = match decoded {
            Ok(barcode) => barcode,
            Err(e) => {
                let err = WorkflowError::recognition(RecognitionStage::Barcode, e.to_string());
                return self
                    .recover(slot, err, ConversationState::AwaitingNameManual)
                    .await;
            }
        };

        match self.products.resolve(&barcode).await {
            ProductLookup::Found(product) => {
                let summary = product.summary();
                slot.advance_with_product(product, ConversationState::AwaitingExpirationImage)?;
                let chat = slot.chat();
                self.reply(chat, OutboundMessage::text(copy::product_detected(&summary)))
                    .await;
                self.reply(chat, OutboundMessage::text(copy::ASK_EXPIRATION_IMAGE))
                    .await;
                Ok(())
            }
            ProductLookup::NotFound | ProductLookup::Failed(_) => {
                let err = WorkflowError::LookupMiss { barcode };
                self.recover(slot, err, ConversationState::AwaitingNameManual)
                    .await
            }
        }
    }

    async fn accept_expiration_image(
        &self,
        slot: &mut SessionSlot,
        image: &ImageRef,
    ) -> Result<(), WorkflowError> {
        let file = self.download(image).await?;
        let recognized = self
            .bounded(
                self.recognizer
                    .recognize(file.path(), &self.settings.recognition),
                |secs| RecognitionError::Timeout { timeout_secs: secs },
            )
            .await;
        release(file);

        let scanned = recognized
            .map_err(|e| e.to_string())
            .and_then(|text| self.dates.scan(&text).map_err(|e| e.to_string()));

        match scanned {
            Ok(date) => {
                self.reply(
                    slot.chat(),
                    OutboundMessage::text(copy::date_detected(date.as_str())),
                )
                .await;
                self.complete(slot, date).await
            }
            Err(reason) => {
                let err = WorkflowError::recognition(RecognitionStage::ExpirationDate, reason);
                self.recover(slot, err, ConversationState::AwaitingDateManual)
                    .await
            }
        }
    }

    /// Schedules the reminder and ends the flow. The session is cleared on
    /// success here, and on failure by the caller.
    async fn complete(
        &self,
        slot: &mut SessionSlot,
        date: ExpirationDate,
    ) -> Result<(), WorkflowError> {
        let product = slot
            .pending_product()
            .cloned()
            .ok_or_else(|| ValidationError::empty_field("product"))?;

        let scheduled = self
            .scheduler
            .schedule(&product, &date)
            .await
            .map_err(|e| match e {
                SchedulingError::Planning(reason) => WorkflowError::UnschedulableDate {
                    date: date.to_string(),
                    reason: reason.to_string(),
                },
                SchedulingError::Calendar(reason) => {
                    WorkflowError::collaborator(Collaborator::Calendar, reason)
                }
            })?;

        slot.complete()?;
        self.reply(
            slot.chat(),
            OutboundMessage::text(copy::reminder_created(
                product.name(),
                scheduled.event.trigger_date(),
            )),
        )
        .await;
        Ok(())
    }

    /// Falls back to `target` and tells the user why.
    async fn recover(
        &self,
        slot: &mut SessionSlot,
        err: WorkflowError,
        target: ConversationState,
    ) -> Result<(), WorkflowError> {
        tracing::info!(error = %err, fallback = %target, "Recovered locally");
        slot.advance(target)?;
        self.reply(slot.chat(), OutboundMessage::text(err.user_message()))
            .await;
        Ok(())
    }

    async fn download(&self, image: &ImageRef) -> Result<ScopedImage, WorkflowError> {
        let bytes = self
            .bounded(self.messaging.download_image(image), |secs| {
                MessagingError::Timeout { timeout_secs: secs }
            })
            .await
            .map_err(|e| WorkflowError::collaborator(Collaborator::Messaging, e))?;

        ScopedImage::write(&self.settings.temp_dir, bytes)
            .await
            .map_err(|e| WorkflowError::collaborator(Collaborator::Messaging, e))
    }

    /// Runs `call` under the configured deadline, mapping expiry to the
    /// port's own timeout error.
    async fn bounded<T, E, F>(&self, call: F, on_timeout: impl FnOnce(u64) -> E) -> Result<T, E>
    where
        F: std::future::Future<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.settings.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(self.settings.call_timeout.as_secs())),
        }
    }

    /// Sends a reply. Delivery failures are logged, never propagated.
    async fn reply(&self, chat: ChatId, message: OutboundMessage) {
        let sent = self
            .bounded(self.messaging.send(chat, message), |secs| {
                MessagingError::Timeout { timeout_secs: secs }
            })
            .await;
        if let Err(e) = sent {
            tracing::warn!(chat_id = chat.value(), error = %e, "Failed to deliver reply");
        }
    }
}

fn release(file: ScopedImage) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp image");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{
        MockBarcodeDecoder, MockCalendar, MockMessaging, MockProductCatalog, MockTextRecognizer,
    };
    use crate::domain::foundation::ActorId;
    use crate::ports::CalendarError;

    const ALLOWED: i64 = 7;
    const CHAT: ChatId = ChatId::new(100);

    struct Harness {
        engine: ConversationEngine,
        messaging: MockMessaging,
        calendar: MockCalendar,
        decoder: MockBarcodeDecoder,
        recognizer: MockTextRecognizer,
        _temp: tempfile::TempDir,
    }

    fn harness_with(
        messaging: MockMessaging,
        decoder: MockBarcodeDecoder,
        recognizer: MockTextRecognizer,
        catalog: MockProductCatalog,
        calendar: MockCalendar,
    ) -> Harness {
        let temp = tempfile::tempdir().unwrap();
        let timeout = Duration::from_millis(300);
        let engine = ConversationEngine::new(
            EngineCollaborators {
                messaging: Arc::new(messaging.clone()),
                recognizer: Arc::new(recognizer.clone()),
                decoder: Arc::new(decoder.clone()),
                products: ProductResolver::new(Arc::new(catalog), timeout),
                scheduler: ReminderScheduler::new(
                    Arc::new(calendar.clone()),
                    "primary",
                    chrono_tz::Europe::Madrid,
                    timeout,
                ),
            },
            AccessList::new([ActorId::new(ALLOWED)]),
            EngineSettings {
                call_timeout: timeout,
                temp_dir: temp.path().to_path_buf(),
                recognition: RecognitionOptions::default(),
            },
        );
        Harness {
            engine,
            messaging,
            calendar,
            decoder,
            recognizer,
            _temp: temp,
        }
    }

    fn harness() -> Harness {
        harness_with(
            MockMessaging::new(),
            MockBarcodeDecoder::new(),
            MockTextRecognizer::new(),
            MockProductCatalog::new(),
            MockCalendar::new(),
        )
    }

    fn event(kind: EventKind) -> InboundEvent {
        InboundEvent::new(CHAT, ActorId::new(ALLOWED), kind)
    }

    fn text(value: &str) -> InboundEvent {
        event(EventKind::from_text(value))
    }

    impl Harness {
        async fn state(&self) -> ConversationState {
            self.engine
                .sessions()
                .snapshot(CHAT)
                .await
                .map(|s| s.state())
                .unwrap_or(ConversationState::Idle)
        }

        async fn drive(&self, events: Vec<InboundEvent>) {
            for e in events {
                self.engine.handle(e).await;
            }
        }

        fn last_text(&self) -> String {
            self.messaging.last_text_for(CHAT).unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn start_offers_method_choice() {
        let h = harness();
        h.drive(vec![text("/start")]).await;

        assert_eq!(h.state().await, ConversationState::ChoosingMethod);
        let sent = h.messaging.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, OutboundMessage::method_choice());
    }

    #[tokio::test]
    async fn manual_flow_completes_and_clears_session() {
        let h = harness();
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
            text("Yogurt"),
            text("15/03/2026"),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::Idle);
        let requests = h.calendar.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].title, "Yogurt");
        assert_eq!(
            h.last_text(),
            "Reminder to consume Yogurt created for Fri Mar 13 2026."
        );
    }

    #[tokio::test]
    async fn blank_name_prompts_again() {
        let h = harness();
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
            text("   "),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::AwaitingNameManual);
        assert_eq!(h.last_text(), copy::ASK_NAME);
    }

    #[tokio::test]
    async fn invalid_manual_date_stays_and_reprompts() {
        let h = harness();
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
            text("Yogurt"),
            text("15-03-2026"),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::AwaitingDateManual);
        assert_eq!(h.last_text(), copy::INVALID_DATE);
        assert!(h.calendar.requests().is_empty());
    }

    #[tokio::test]
    async fn impossible_date_clears_session_without_event() {
        let h = harness();
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
            text("Yogurt"),
            text("31/02/2026"),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::Idle);
        assert!(h.calendar.requests().is_empty());
        assert_eq!(h.last_text(), copy::not_a_calendar_date("31/02/2026"));
    }

    #[tokio::test]
    async fn calendar_failure_reports_and_clears() {
        let h = harness_with(
            MockMessaging::new(),
            MockBarcodeDecoder::new(),
            MockTextRecognizer::new(),
            MockProductCatalog::new(),
            MockCalendar::new().failing(CalendarError::Network("reset".to_string())),
        );
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
            text("Yogurt"),
            text("03/2026"),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::Idle);
        assert_eq!(h.calendar.requests().len(), 1);
        assert_eq!(h.last_text(), copy::CALENDAR_FAILED);
    }

    #[tokio::test]
    async fn expiration_photo_without_date_falls_back_to_manual() {
        let image = ImageRef::new("expiry-photo");
        let h = harness_with(
            MockMessaging::new()
                .with_image(&ImageRef::new("barcode-photo"), vec![1])
                .with_image(&image, vec![2]),
            MockBarcodeDecoder::new().with_payload("8000500310427"),
            MockTextRecognizer::new().with_text("LOTE 4521 CONSUMIR PREFERENTEMENTE"),
            MockProductCatalog::new()
                .with_product("8000500310427", Product::named("Nutella").unwrap()),
            MockCalendar::new(),
        );
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Photo)),
            event(EventKind::Image(ImageRef::new("barcode-photo"))),
            event(EventKind::Image(image)),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::AwaitingDateManual);
        assert_eq!(h.last_text(), copy::EXPIRATION_UNREADABLE);
        assert!(h.recognizer.seen().iter().all(|seen| seen.existed));
        assert!(h.recognizer.seen().iter().all(|seen| !seen.path.exists()));
    }

    #[tokio::test]
    async fn ocr_date_completes_flow() {
        let h = harness_with(
            MockMessaging::new()
                .with_image(&ImageRef::new("barcode"), vec![1])
                .with_image(&ImageRef::new("label"), vec![2]),
            MockBarcodeDecoder::new().with_payload("123"),
            MockTextRecognizer::new().with_text("CAD 12-2026 L23"),
            MockProductCatalog::new().with_product("123", Product::named("Ham").unwrap()),
            MockCalendar::new(),
        );
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Photo)),
            event(EventKind::Image(ImageRef::new("barcode"))),
            event(EventKind::Image(ImageRef::new("label"))),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::Idle);
        let texts = h.messaging.texts_for(CHAT);
        assert!(texts.contains(&copy::date_detected("01/12/2026")));
        let requests = h.calendar.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].start.to_rfc3339(), "2026-11-29T00:00:00+01:00");
    }

    #[tokio::test]
    async fn missing_image_clears_session() {
        let h = harness();
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Photo)),
            event(EventKind::Image(ImageRef::new("gone"))),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::Idle);
        assert_eq!(h.last_text(), copy::IMAGE_FAILED);
        assert!(h.decoder.seen().is_empty());
    }

    #[tokio::test]
    async fn event_without_transition_is_ignored() {
        let h = harness();
        h.drive(vec![text("/start"), text("hello")]).await;

        assert_eq!(h.state().await, ConversationState::ChoosingMethod);
        assert_eq!(h.messaging.sent().len(), 1);
    }

    #[tokio::test]
    async fn photo_while_idle_is_ignored() {
        let h = harness();
        h.drive(vec![event(EventKind::Image(ImageRef::new("x")))])
            .await;

        assert_eq!(h.state().await, ConversationState::Idle);
        assert!(h.messaging.sent().is_empty());
        assert_eq!(h.engine.sessions().tracked_chats(), 0);
    }

    #[tokio::test]
    async fn restart_discards_pending_product() {
        let h = harness();
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
            text("Yogurt"),
            text("/start"),
        ])
        .await;

        let session = h.engine.sessions().snapshot(CHAT).await.unwrap();
        assert_eq!(session.state(), ConversationState::ChoosingMethod);
        assert!(session.pending_product().is_none());
    }

    #[tokio::test]
    async fn unauthorized_actor_is_rejected_without_session() {
        let h = harness();
        h.engine
            .handle(InboundEvent::new(
                CHAT,
                ActorId::new(ALLOWED + 1),
                EventKind::Start,
            ))
            .await;

        assert_eq!(h.last_text(), copy::REJECTION);
        assert_eq!(h.engine.sessions().tracked_chats(), 0);
    }

    #[tokio::test]
    async fn failed_reply_does_not_break_flow() {
        let h = harness_with(
            MockMessaging::new().failing_sends(MessagingError::network("offline")),
            MockBarcodeDecoder::new(),
            MockTextRecognizer::new(),
            MockProductCatalog::new(),
            MockCalendar::new(),
        );
        h.drive(vec![
            text("/start"),
            event(EventKind::Choice(MethodChoice::Manual)),
        ])
        .await;

        assert_eq!(h.state().await, ConversationState::AwaitingNameManual);
    }
}
