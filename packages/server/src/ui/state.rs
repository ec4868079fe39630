//! Server state: the wired-up use cases shared by every connection task.

use std::sync::Arc;

use stockhammer_shared::time::Clock;

use crate::{
    domain::{MessagePusher, StateRepository},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, MutationLock, ReportSafetyUseCase,
        RequestInitialDataUseCase, ResetDataUseCase, SendMessageUseCase, ToggleReactionUseCase,
        TypingUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub report_safety_usecase: Arc<ReportSafetyUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub request_initial_data_usecase: Arc<RequestInitialDataUseCase>,
    pub reset_data_usecase: Arc<ResetDataUseCase>,
    pub typing_usecase: Arc<TypingUseCase>,
    pub toggle_reaction_usecase: Arc<ToggleReactionUseCase>,
}

impl AppState {
    /// Wire every use case to one repository, one connection registry and
    /// one shared mutation lock.
    pub fn new(
        repository: Arc<dyn StateRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let lock = Arc::new(MutationLock::new());

        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
            )),
            report_safety_usecase: Arc::new(ReportSafetyUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
            )),
            request_initial_data_usecase: Arc::new(RequestInitialDataUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
            )),
            reset_data_usecase: Arc::new(ResetDataUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
            )),
            typing_usecase: Arc::new(TypingUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                lock.clone(),
                clock,
            )),
            toggle_reaction_usecase: Arc::new(ToggleReactionUseCase::new(
                repository,
                message_pusher,
                lock,
            )),
        }
    }
}
