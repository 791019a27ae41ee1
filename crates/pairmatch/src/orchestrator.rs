//! The connection orchestrator: lobby, sessions, rooms and games in one
//! place.
//!
//! [`Orchestrator`] is plain state plus one handler per client action. It
//! is owned by the actor task in [`crate::actor`], which feeds it one
//! command at a time, so no handler ever races another. Broadcasts are
//! pushed into the members' outboxes before the handler returns, so they
//! reach clients in the order actions were accepted.

use std::collections::HashMap;

use pairmatch_engine::{EngineConfig, Game, PlayOutcome, PlayerSlot};
use pairmatch_lobby::Lobby;
use pairmatch_protocol::{
    ChannelId, ClientAction, GameId, Identity, Pairing, PlayRequest, PrivateMessage,
};
use pairmatch_session::SessionManager;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;

use crate::actor::OrchestratorCommand;
use crate::events::{AckResponse, ChatLine, QuitNotice, ServerEvent, ServerFrame};
use crate::rooms::{RoomKey, RoomTable};
use crate::OrchestratorError;

/// Outbound frame queue of one connection, drained by its writer task.
pub type Outbox = mpsc::UnboundedSender<ServerFrame>;

pub(crate) struct Orchestrator {
    lobby: Lobby,
    sessions: SessionManager,
    rooms: RoomTable,
    outboxes: HashMap<ChannelId, Outbox>,
    config: EngineConfig,
    rng: StdRng,
    /// Re-entry point for flip-back timers. Weak so pending timers don't
    /// keep the actor alive after every handle is gone.
    commands: mpsc::WeakSender<OrchestratorCommand>,
}

impl Orchestrator {
    pub(crate) fn new(config: EngineConfig, commands: mpsc::WeakSender<OrchestratorCommand>) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            lobby: Lobby::new(),
            sessions: SessionManager::new(),
            rooms: RoomTable::new(),
            outboxes: HashMap::new(),
            config,
            rng,
            commands,
        }
    }

    // -----------------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------------

    pub(crate) fn connect(&mut self, channel: ChannelId, outbox: Outbox) {
        if let Err(e) = self.sessions.open(channel) {
            tracing::warn!(%channel, error = %e, "duplicate connect ignored");
            return;
        }
        self.outboxes.insert(channel, outbox);
        tracing::info!(%channel, connections = self.outboxes.len(), "connection registered");
    }

    pub(crate) fn disconnect(&mut self, channel: ChannelId) {
        self.release(channel);
        self.rooms.leave_all(channel);
        self.sessions.close(channel);
        self.outboxes.remove(&channel);
        tracing::info!(%channel, connections = self.outboxes.len(), "connection released");
    }

    /// Withdraws the connection's offers and interrupts its running games,
    /// leaving every game room it was in.
    fn release(&mut self, channel: ChannelId) {
        let before = self.lobby.len();
        let remaining = self.lobby.leave_lobby(channel);
        if remaining.len() != before {
            self.broadcast(RoomKey::Lobby, ServerEvent::LobbyChanged(remaining));
        }

        for game_id in self.rooms.game_rooms_of(channel) {
            let interrupted = self
                .rooms
                .game_mut(game_id)
                .ok()
                .and_then(|game| game.interrupt().then(|| game.clone()));
            if let Some(game) = interrupted {
                self.broadcast(RoomKey::Game(game_id), ServerEvent::GameInterrupted(game));
            }
            self.rooms.leave(RoomKey::Game(game_id), channel);
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    pub(crate) fn dispatch(
        &mut self,
        channel: ChannelId,
        action: ClientAction,
    ) -> Result<AckResponse, OrchestratorError> {
        match action {
            ClientAction::Login(identity) => self.login(channel, identity),
            ClientAction::Logout(_) => self.logout(channel),
            ClientAction::FetchGames => self.fetch_games(channel),
            ClientAction::AddGame {
                game_id,
                board_size,
            } => self.add_game(channel, game_id, board_size),
            ClientAction::JoinGame(game_id) => self.join_game(channel, game_id),
            ClientAction::RemoveGame(game_id) => self.remove_game(channel, game_id),
            ClientAction::StartGame(pairing) => self.start_game(channel, pairing),
            ClientAction::FetchPlayingGames => self.fetch_playing_games(channel),
            ClientAction::Play(request) => self.play(channel, request),
            ClientAction::QuitGame(game_id) => self.quit_game(channel, game_id),
            ClientAction::CloseGame(game_id) => self.close_game(channel, game_id),
            ClientAction::ChatMessage(message) => self.chat(channel, message),
            ClientAction::PrivateMessage(message) => self.private_message(channel, message),
        }
    }

    fn identity(&self, channel: ChannelId) -> Result<Identity, OrchestratorError> {
        Ok(self.sessions.identity(channel)?.clone())
    }

    // -----------------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------------

    fn login(
        &mut self,
        channel: ChannelId,
        identity: Identity,
    ) -> Result<AckResponse, OrchestratorError> {
        let user_room = RoomKey::User(identity.id);
        if let Some(previous) = self.sessions.login(channel, identity)? {
            let old_room = RoomKey::User(previous.id);
            if old_room != user_room {
                self.rooms.leave(old_room, channel);
            }
        }
        self.rooms.join(user_room, channel);
        self.rooms.join(RoomKey::Lobby, channel);
        Ok(AckResponse::Done(true))
    }

    fn logout(&mut self, channel: ChannelId) -> Result<AckResponse, OrchestratorError> {
        let identity = self.identity(channel)?;
        self.release(channel);
        self.rooms.leave(RoomKey::User(identity.id), channel);
        self.rooms.leave(RoomKey::Lobby, channel);
        self.sessions.logout(channel)?;
        Ok(AckResponse::Done(true))
    }

    // -----------------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------------

    fn fetch_games(&self, channel: ChannelId) -> Result<AckResponse, OrchestratorError> {
        self.identity(channel)?;
        Ok(AckResponse::Offers(self.lobby.get_games()))
    }

    fn add_game(
        &mut self,
        channel: ChannelId,
        game_id: GameId,
        board_size: usize,
    ) -> Result<AckResponse, OrchestratorError> {
        let identity = self.identity(channel)?;
        let offer = self.lobby.add_game(identity, channel, game_id, board_size);
        self.broadcast_lobby();
        Ok(AckResponse::Offer(offer))
    }

    fn join_game(
        &mut self,
        channel: ChannelId,
        game_id: GameId,
    ) -> Result<AckResponse, OrchestratorError> {
        let identity = self.identity(channel)?;
        let offer = self
            .lobby
            .get_game(game_id)
            .ok_or(OrchestratorError::GameNotFound(game_id))?;
        if offer.creator.id == identity.id {
            return Err(OrchestratorError::CannotJoinOwnGame);
        }

        let offer = self
            .lobby
            .remove_game(game_id)
            .ok_or(OrchestratorError::GameNotFound(game_id))?;
        let pairing = offer.into_pairing(identity, channel);
        tracing::info!(%game_id, %channel, "offer joined");
        self.broadcast_lobby();
        Ok(AckResponse::Pairing(pairing))
    }

    fn remove_game(
        &mut self,
        channel: ChannelId,
        game_id: GameId,
    ) -> Result<AckResponse, OrchestratorError> {
        let identity = self.identity(channel)?;
        let offer = self
            .lobby
            .get_game(game_id)
            .ok_or(OrchestratorError::GameNotFound(game_id))?;
        if offer.creator.id != identity.id {
            return Err(OrchestratorError::CannotRemoveOthersGame);
        }

        let offer = self
            .lobby
            .remove_game(game_id)
            .ok_or(OrchestratorError::GameNotFound(game_id))?;
        self.broadcast_lobby();
        Ok(AckResponse::Offer(offer))
    }

    // -----------------------------------------------------------------------
    // Games
    // -----------------------------------------------------------------------

    fn start_game(
        &mut self,
        channel: ChannelId,
        pairing: Pairing,
    ) -> Result<AckResponse, OrchestratorError> {
        self.identity(channel)?;
        let game_id = pairing.id;
        if pairing.player1_channel == pairing.player2_channel {
            return Err(OrchestratorError::InvalidPairing(game_id));
        }
        if channel != pairing.player1_channel && channel != pairing.player2_channel {
            return Err(OrchestratorError::NotAParticipant(game_id));
        }
        if self.rooms.game(game_id).is_ok_and(|game| !game.game_ended()) {
            return Err(OrchestratorError::GameAlreadyStarted(game_id));
        }

        let mut game = Game::new(pairing);
        game.init(&mut self.rng)?;

        let key = RoomKey::Game(game_id);
        for seat in [game.channel(PlayerSlot::One), game.channel(PlayerSlot::Two)] {
            if self.outboxes.contains_key(&seat) {
                self.rooms.join(key, seat);
            } else {
                tracing::warn!(%game_id, channel = %seat, "player connection gone, not seated in room");
            }
        }
        let generation = self.rooms.attach_game(game.clone())?;

        tracing::info!(%game_id, %channel, generation, "game started");
        self.broadcast(key, ServerEvent::GameStarted(game.clone()));
        Ok(AckResponse::Game(game))
    }

    fn fetch_playing_games(&self, channel: ChannelId) -> Result<AckResponse, OrchestratorError> {
        self.identity(channel)?;
        let games = self
            .rooms
            .game_rooms_of(channel)
            .into_iter()
            .filter_map(|id| self.rooms.game(id).ok().cloned())
            .collect();
        Ok(AckResponse::Games(games))
    }

    fn play(
        &mut self,
        channel: ChannelId,
        request: PlayRequest,
    ) -> Result<AckResponse, OrchestratorError> {
        self.identity(channel)?;
        let game_id = request.game_id;
        let game = self.rooms.game_mut(game_id)?;
        let outcome = game.play(request.index, channel)?;
        let snapshot = game.clone();

        let key = RoomKey::Game(game_id);
        self.broadcast(key, ServerEvent::GameChanged(snapshot.clone()));
        match outcome {
            PlayOutcome::Mismatch => {
                if let Some(generation) = self.rooms.generation(game_id) {
                    self.schedule_flip_back(game_id, generation);
                }
            }
            PlayOutcome::Match { completed: true } => {
                tracing::info!(%game_id, status = %snapshot.status(), "game ended");
                self.broadcast(key, ServerEvent::GameEnded(snapshot));
            }
            PlayOutcome::FirstPick | PlayOutcome::Match { completed: false } => {}
        }
        Ok(AckResponse::Done(true))
    }

    fn quit_game(
        &mut self,
        channel: ChannelId,
        game_id: GameId,
    ) -> Result<AckResponse, OrchestratorError> {
        self.identity(channel)?;
        let game = self.rooms.game_mut(game_id)?;
        let seat = game.quit(channel)?;
        let snapshot = game.clone();
        let quitter = snapshot.player(seat).clone();

        let key = RoomKey::Game(game_id);
        self.broadcast(key, ServerEvent::GameChanged(snapshot.clone()));
        self.broadcast(
            key,
            ServerEvent::GameQuitted(QuitNotice {
                quitter,
                game: snapshot.clone(),
            }),
        );
        self.broadcast(key, ServerEvent::GameEnded(snapshot.clone()));
        self.rooms.leave(key, channel);
        Ok(AckResponse::Game(snapshot))
    }

    fn close_game(
        &mut self,
        channel: ChannelId,
        game_id: GameId,
    ) -> Result<AckResponse, OrchestratorError> {
        self.identity(channel)?;
        self.rooms.game(game_id)?.close(channel)?;
        self.rooms.leave(RoomKey::Game(game_id), channel);
        Ok(AckResponse::Done(true))
    }

    /// Closes the lock window of a mismatch. Runs when the flip-back timer
    /// fires, even if the game ended in the meantime.
    ///
    /// A timer scheduled for an earlier game in the same room is ignored: the
    /// game now in the room gets its own full lock window.
    pub(crate) fn flip_back(&mut self, game_id: GameId, generation: u64) {
        if let Some(current) = self.rooms.generation(game_id) {
            if current != generation {
                tracing::debug!(%game_id, generation, current, "stale flip-back ignored");
                return;
            }
        }
        let game = match self.rooms.game_mut(game_id) {
            Ok(game) => game,
            Err(e) => {
                tracing::warn!(%game_id, error = %e, "flip-back for a vanished game");
                return;
            }
        };
        if game.flip_back() {
            let snapshot = game.clone();
            self.broadcast(RoomKey::Game(game_id), ServerEvent::GameChanged(snapshot));
        }
    }

    fn schedule_flip_back(&self, game_id: GameId, generation: u64) {
        let commands = self.commands.clone();
        let delay = self.config.flip_back_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = commands.upgrade() {
                let command = OrchestratorCommand::FlipBack {
                    game_id,
                    generation,
                };
                let _ = sender.send(command).await;
            }
        });
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    fn chat(&self, channel: ChannelId, message: String) -> Result<AckResponse, OrchestratorError> {
        let line = ChatLine {
            user: self.sessions.identity(channel).ok().cloned(),
            message,
        };
        let frame = ServerFrame::Event(ServerEvent::ChatMessage(line));
        for outbox in self.outboxes.values() {
            let _ = outbox.send(frame.clone());
        }
        Ok(AckResponse::Done(true))
    }

    fn private_message(
        &self,
        channel: ChannelId,
        message: PrivateMessage,
    ) -> Result<AckResponse, OrchestratorError> {
        let key = RoomKey::User(message.destination_user.id);
        if self.rooms.members(key).is_empty() {
            return Err(OrchestratorError::UserOffline(message.destination_user.name));
        }
        let line = ChatLine {
            user: self.sessions.identity(channel).ok().cloned(),
            message: message.message,
        };
        self.broadcast(key, ServerEvent::PrivateMessage(line));
        Ok(AckResponse::Delivered { success: true })
    }

    // -----------------------------------------------------------------------
    // Fan-out
    // -----------------------------------------------------------------------

    fn broadcast_lobby(&self) {
        self.broadcast(RoomKey::Lobby, ServerEvent::LobbyChanged(self.lobby.get_games()));
    }

    /// Pushes `event` to every member of the room. Members whose writer is
    /// gone are skipped.
    fn broadcast(&self, key: RoomKey, event: ServerEvent) {
        let members = self.rooms.members(key);
        tracing::debug!(room = %key, event = event.name(), members = members.len(), "broadcast");
        let frame = ServerFrame::Event(event);
        for channel in members {
            if let Some(outbox) = self.outboxes.get(&channel) {
                let _ = outbox.send(frame.clone());
            }
        }
    }
}
