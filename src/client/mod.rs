//! Main `NymphCast` client implementation

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::control::{PlaybackCommand, SeekRequest, StreamCycle, Volume};
use crate::discovery::{DiscoveryTransport, RemoteRegistry, ServiceKind};
use crate::error::{NymphCastError, Result};
use crate::events::StatusBridge;
use crate::group::{GroupCoordinator, PlaybackGroup, ShareResult};
use crate::rpc::{RpcCaller, RpcTransport, RpcValue, SessionHandle};
use crate::streaming::{MediaSource, SessionState, StreamingSession};
use crate::types::{ClientConfig, MediaFile, PlaybackStatus, Remote};

mod callbacks;


use callbacks::SessionEndpoint;

/// State shared between the client and the callback tables it registers
struct Shared {
    caller: RpcCaller,
    config: ClientConfig,
    client_id: RwLock<String>,
    sessions: RwLock<HashMap<SessionHandle, Arc<StreamingSession>>>,
    bridge: StatusBridge,
}

impl Shared {
    async fn session(&self, handle: SessionHandle) -> Option<Arc<StreamingSession>> {
        self.sessions.read().await.get(&handle).cloned()
    }

    /// Drop every trace of a session the transport has already closed
    async fn forget(&self, handle: SessionHandle) {
        self.caller.transport().remove_callbacks(handle);
        let session = self.sessions.write().await.remove(&handle);
        if let Some(session) = session {
            session.stop().await;
            tracing::debug!("Forgot session {}", handle);
        }
    }

    /// Pass a result through, forgetting the session if it was torn down
    async fn settle<T>(&self, handle: SessionHandle, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_session_fatal() {
                self.forget(handle).await;
            }
        }
        result
    }

    async fn call_code(&self, handle: SessionHandle, method: &str, args: Vec<RpcValue>) -> Result<u8> {
        let result = self.caller.call_code(handle, method, args).await;
        self.settle(handle, result).await
    }

    async fn call_string(&self, handle: SessionHandle, method: &str, args: Vec<RpcValue>) -> Result<String> {
        let result = self.caller.call_string(handle, method, args).await;
        self.settle(handle, result).await
    }
}

/// Controller for `NymphCast` receivers and media servers
///
/// Owns the live receiver sessions, the discovery registry and the event
/// handlers. Every operation reports failure through `Result`; a call that
/// does not complete tears its session down before the error is returned.
///
/// # Example
///
/// ```rust,no_run
/// use nymphcast_client::{ClientConfig, NymphCastClient};
/// use nymphcast_client::testing::{MockDiscovery, MockTransport};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), nymphcast_client::NymphCastError> {
/// let client = NymphCastClient::new(
///     ClientConfig::default(),
///     Arc::new(MockTransport::new()),
///     Arc::new(MockDiscovery::new()),
/// );
///
/// let receivers = client.find_servers().await;
/// if let Some(receiver) = receivers.first() {
///     let handle = client.connect_server(&receiver.ipv4, receiver.port).await?;
///     client.cast_file(handle, "/music/track.mp3").await?;
///     client.playback_start(handle).await?;
///     client.disconnect_server(handle).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct NymphCastClient {
    shared: Arc<Shared>,
    registry: RemoteRegistry,
    group: GroupCoordinator,
}

impl NymphCastClient {
    /// Create a client over the external RPC and discovery transports
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn RpcTransport>,
        discovery: Arc<dyn DiscoveryTransport>,
    ) -> Self {
        let caller = RpcCaller::new(transport, config.rpc_timeout);
        let group = GroupCoordinator::new(caller.clone());
        let shared = Arc::new(Shared {
            caller,
            client_id: RwLock::new(config.client_id.clone()),
            config,
            sessions: RwLock::new(HashMap::new()),
            bridge: StatusBridge::new(),
        });

        Self {
            shared,
            registry: RemoteRegistry::new(discovery),
            group,
        }
    }

    /// Client configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Discovery registry
    #[must_use]
    pub fn registry(&self) -> &RemoteRegistry {
        &self.registry
    }

    // === Identity and handlers ===

    /// Set the identifier sent with `connect`
    pub async fn set_client_id(&self, id: impl Into<String>) {
        *self.shared.client_id.write().await = id.into();
    }

    /// Current client identifier
    pub async fn client_id(&self) -> String {
        self.shared.client_id.read().await.clone()
    }

    /// Register the handler for messages from receiver applications
    pub fn set_application_callback<F>(&self, handler: F)
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.shared.bridge.set_app_message_handler(handler);
    }

    /// Register the handler for receiver status pushes
    pub fn set_status_update_callback<F>(&self, handler: F)
    where
        F: Fn(SessionHandle, &PlaybackStatus) + Send + Sync + 'static,
    {
        self.shared.bridge.set_status_handler(handler);
    }

    /// Register the handler for receivers stopping playback
    pub fn set_playback_stopped_callback<F>(&self, handler: F)
    where
        F: Fn(SessionHandle) + Send + Sync + 'static,
    {
        self.shared.bridge.set_stopped_handler(handler);
    }

    // === Discovery ===

    /// Find receivers on the network
    pub async fn find_servers(&self) -> Vec<Remote> {
        self.registry
            .discover_kind(ServiceKind::Receiver, self.shared.config.receiver_port)
            .await
    }

    /// Find media servers on the network
    pub async fn find_shares(&self) -> Vec<Remote> {
        self.registry
            .discover_kind(ServiceKind::MediaServer, self.shared.config.media_server_port)
            .await
    }

    /// Find receivers and media servers concurrently
    pub async fn find_all(&self) -> (Vec<Remote>, Vec<Remote>) {
        self.registry
            .discover_all(
                self.shared.config.receiver_port,
                self.shared.config.media_server_port,
            )
            .await
    }

    // === Connection ===

    /// Connect to a receiver
    ///
    /// An empty `host` or a zero `port` fall back to the configured
    /// defaults. The session's callback table is registered before the
    /// receiver is told about this client.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the receiver cannot be reached, or
    /// `Transport` if the `connect` call fails.
    pub async fn connect_server(&self, host: &str, port: u16) -> Result<SessionHandle> {
        let config = &self.shared.config;
        let host = if host.is_empty() { config.default_host.as_str() } else { host };
        let port = if port == 0 { config.receiver_port } else { port };

        let handle = self.shared.caller.connect(host, port).await?;

        self.shared.caller.transport().register_callbacks(
            handle,
            Arc::new(SessionEndpoint::new(Arc::downgrade(&self.shared))),
        );
        self.shared.sessions.write().await.insert(
            handle,
            Arc::new(
                StreamingSession::new(handle, config.default_block_size())
                    .with_max_block_size(config.max_block_size()),
            ),
        );

        let client_id = self.client_id().await;
        let result = self
            .shared
            .caller
            .call(handle, "connect", vec![RpcValue::from(client_id)])
            .await;
        self.shared.settle(handle, result).await?;

        tracing::info!("Connected to receiver {}:{} as session {}", host, port, handle);
        Ok(handle)
    }

    /// Disconnect from a receiver
    ///
    /// Callbacks are unregistered first, so no data request reaches a
    /// session being torn down. The open source, if any, is closed.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the `disconnect` call fails; the session is
    /// closed either way.
    pub async fn disconnect_server(&self, handle: SessionHandle) -> Result<()> {
        self.shared.caller.transport().remove_callbacks(handle);

        let result = self.shared.caller.call(handle, "disconnect", Vec::new()).await;
        if result.is_ok() {
            self.shared.caller.close(handle).await;
        }
        self.shared.forget(handle).await;

        tracing::info!("Disconnected session {}", handle);
        result.map(|_| ())
    }

    /// Streaming session of a connected receiver
    pub async fn session(&self, handle: SessionHandle) -> Option<Arc<StreamingSession>> {
        self.shared.session(handle).await
    }

    /// Streaming state of a connected receiver
    pub async fn session_state(&self, handle: SessionHandle) -> Option<SessionState> {
        match self.shared.session(handle).await {
            Some(session) => Some(session.state().await),
            None => None,
        }
    }

    /// Handles of all connected receivers
    pub async fn sessions(&self) -> Vec<SessionHandle> {
        let mut handles: Vec<SessionHandle> = self.shared.sessions.read().await.keys().copied().collect();
        handles.sort();
        handles
    }

    // === Applications ===

    /// List the applications on a receiver, one per line
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `ProtocolMismatch` if the answer
    /// is not a string.
    pub async fn get_application_list(&self, handle: SessionHandle) -> Result<String> {
        self.shared.call_string(handle, "app_list", Vec::new()).await
    }

    /// Send a message to a receiver application and return its answer
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `ProtocolMismatch` if the answer
    /// is not a string.
    pub async fn send_application_message(
        &self,
        handle: SessionHandle,
        app_id: &str,
        message: &str,
        format: u8,
    ) -> Result<String> {
        let args = vec![
            RpcValue::from(app_id),
            RpcValue::from(message),
            RpcValue::U8(format),
        ];
        self.shared.call_string(handle, "app_send", args).await
    }

    /// Load a named resource of a receiver application, or a global one
    /// when `app_id` is empty
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `ProtocolMismatch` if the answer
    /// is not a string.
    pub async fn load_resource(&self, handle: SessionHandle, app_id: &str, name: &str) -> Result<String> {
        let args = vec![RpcValue::from(app_id), RpcValue::from(name)];
        self.shared.call_string(handle, "app_loadResource", args).await
    }

    // === Shares ===

    /// List the files shared by a media server
    ///
    /// Uses a connection that only lives for this call. Parsing stops at the
    /// first malformed entry; the entries before it are returned.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed`/`Transport` if the server cannot be
    /// reached, `ProtocolMismatch` if the answer is not a list.
    pub async fn get_shares(&self, media_server: &Remote) -> Result<Vec<MediaFile>> {
        let caller = &self.shared.caller;
        let handle = caller.connect(&media_server.ipv4, media_server.port).await?;

        let value = caller.call(handle, "getFileList", Vec::new()).await?;
        caller.close(handle).await;

        parse_file_list(media_server, &value)
    }

    /// List the files shared by a connected receiver
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `ProtocolMismatch` if the answer
    /// is not a list.
    pub async fn get_receiver_shares(&self, handle: SessionHandle, receiver: &Remote) -> Result<Vec<MediaFile>> {
        let result = self.shared.caller.call(handle, "getFileList", Vec::new()).await;
        let value = self.shared.settle(handle, result).await?;
        parse_file_list(receiver, &value)
    }

    /// Play a shared file on one or more receivers
    ///
    /// The first receiver becomes the master, the rest mirror it. The list
    /// is sent as given, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty receiver list, otherwise as
    /// [`GroupCoordinator::play_share`].
    pub async fn play_share(&self, file: &MediaFile, receivers: &[Remote]) -> Result<ShareResult> {
        let group = PlaybackGroup::from_receivers(receivers.to_vec()).ok_or_else(|| {
            NymphCastError::InvalidParameter {
                name: "receivers".to_string(),
                message: "at least one receiver is required".to_string(),
            }
        })?;
        self.group.play_share(file, &group).await
    }

    /// Play a shared file on an already formed group
    ///
    /// # Errors
    ///
    /// As [`GroupCoordinator::play_share`].
    pub async fn play_group(&self, file: &MediaFile, group: &PlaybackGroup) -> Result<ShareResult> {
        self.group.play_share(file, group).await
    }

    /// Play a file from a connected receiver's own share
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `Rejected` for a non-zero code.
    pub async fn play_receiver_share(&self, handle: SessionHandle, file: &MediaFile) -> Result<()> {
        let result = self.group.play_receiver_share(handle, file).await;
        self.shared.settle(handle, result).await
    }

    /// Set the slaves a playing master mirrors its status to
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure, `Rejected` for a non-zero code.
    pub async fn add_slaves(&self, handle: SessionHandle, slaves: &[Remote]) -> Result<()> {
        let result = self.group.add_slaves(handle, slaves).await;
        self.shared.settle(handle, result).await
    }

    // === Casting ===

    /// Stream a local file to a connected receiver
    ///
    /// Any source already open on the session is closed first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty path and `FileNotFound` if
    /// nothing exists there, both before any network activity. Otherwise as
    /// [`Self::cast_source`].
    pub async fn cast_file(&self, handle: SessionHandle, path: impl AsRef<Path>) -> Result<u8> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(NymphCastError::InvalidParameter {
                name: "path".to_string(),
                message: "file name is empty".to_string(),
            });
        }
        if !path.is_file() {
            return Err(NymphCastError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        tracing::info!("Opening file '{}'", path.display());
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();

        self.cast_source(handle, Box::new(file), size).await
    }

    /// Stream any seekable source to a connected receiver
    ///
    /// Installs the source on the session and sends `session_start`. The
    /// receiver then pulls data through the session's callbacks. On a
    /// non-zero result the source is closed again and the code returned.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` for an unknown handle, `Transport` if the call
    /// fails.
    pub async fn cast_source(&self, handle: SessionHandle, source: Box<dyn MediaSource>, size: u64) -> Result<u8> {
        let session = self
            .shared
            .session(handle)
            .await
            .ok_or(NymphCastError::NotConnected { handle })?;

        session.open(source, size).await;

        let filesize = u32::try_from(size).map_or(RpcValue::U64(size), RpcValue::U32);
        let args = vec![RpcValue::structure([("filesize", filesize)])];
        let code = self.shared.call_code(handle, "session_start", args).await?;

        if code != 0 {
            tracing::warn!("Receiver {} refused session start with code {}", handle, code);
            session.reset().await;
        }
        Ok(code)
    }

    /// Ask a receiver to play a URL itself
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn cast_url(&self, handle: SessionHandle, url: &str) -> Result<u8> {
        self.shared
            .call_code(handle, "playback_url", vec![RpcValue::from(url)])
            .await
    }

    // === Volume ===

    /// Set the volume
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn volume_set(&self, handle: SessionHandle, volume: Volume) -> Result<u8> {
        self.shared
            .call_code(handle, "volume_set", vec![volume.into()])
            .await
    }

    /// Raise the volume one step
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn volume_up(&self, handle: SessionHandle) -> Result<u8> {
        self.shared.call_code(handle, "volume_up", Vec::new()).await
    }

    /// Lower the volume one step
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn volume_down(&self, handle: SessionHandle) -> Result<u8> {
        self.shared.call_code(handle, "volume_down", Vec::new()).await
    }

    /// Toggle mute
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn volume_mute(&self, handle: SessionHandle) -> Result<u8> {
        self.shared.call_code(handle, "volume_mute", Vec::new()).await
    }

    // === Playback ===

    /// Send a transport command
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback(&self, handle: SessionHandle, command: PlaybackCommand) -> Result<u8> {
        self.shared.call_code(handle, command.method(), Vec::new()).await
    }

    /// Start or resume playback
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_start(&self, handle: SessionHandle) -> Result<u8> {
        self.playback(handle, PlaybackCommand::Start).await
    }

    /// Stop playback
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_stop(&self, handle: SessionHandle) -> Result<u8> {
        self.playback(handle, PlaybackCommand::Stop).await
    }

    /// Pause playback
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_pause(&self, handle: SessionHandle) -> Result<u8> {
        self.playback(handle, PlaybackCommand::Pause).await
    }

    /// Rewind
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_rewind(&self, handle: SessionHandle) -> Result<u8> {
        self.playback(handle, PlaybackCommand::Rewind).await
    }

    /// Fast forward
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_forward(&self, handle: SessionHandle) -> Result<u8> {
        self.playback(handle, PlaybackCommand::Forward).await
    }

    /// Seek within the playing media
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_seek(&self, handle: SessionHandle, request: SeekRequest) -> Result<u8> {
        self.shared
            .call_code(handle, "playback_seek", vec![request.to_rpc()])
            .await
    }

    /// Query the receiver's playback status
    ///
    /// A record missing any field yields a status with `error` set rather
    /// than an `Err`; that points at a protocol version mismatch.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn playback_status(&self, handle: SessionHandle) -> Result<PlaybackStatus> {
        let result = self.shared.caller.call(handle, "playback_status", Vec::new()).await;
        let record = self.shared.settle(handle, result).await?;

        match PlaybackStatus::from_rpc(&record) {
            Ok(status) => Ok(status),
            Err(field) => {
                tracing::warn!("Status of session {} is missing value '{}'", handle, field);
                Ok(PlaybackStatus::failed())
            }
        }
    }

    // === Streams ===

    /// Switch to the next stream of a kind
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn cycle(&self, handle: SessionHandle, stream: StreamCycle) -> Result<u8> {
        self.shared.call_code(handle, stream.method(), Vec::new()).await
    }

    /// Switch to the next subtitle track
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn cycle_subtitles(&self, handle: SessionHandle) -> Result<u8> {
        self.cycle(handle, StreamCycle::Subtitle).await
    }

    /// Switch to the next audio stream
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn cycle_audio(&self, handle: SessionHandle) -> Result<u8> {
        self.cycle(handle, StreamCycle::Audio).await
    }

    /// Switch to the next video stream
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn cycle_video(&self, handle: SessionHandle) -> Result<u8> {
        self.cycle(handle, StreamCycle::Video).await
    }

    /// Turn subtitles on or off
    ///
    /// # Errors
    ///
    /// Returns `Transport` on call failure.
    pub async fn enable_subtitles(&self, handle: SessionHandle, state: bool) -> Result<u8> {
        self.shared
            .call_code(handle, "subtitles_set", vec![RpcValue::Bool(state)])
            .await
    }
}

fn parse_file_list(server: &Remote, value: &RpcValue) -> Result<Vec<MediaFile>> {
    let entries = value
        .as_array()
        .ok_or_else(|| NymphCastError::ProtocolMismatch {
            method: "getFileList".to_string(),
            detail: format!("expected array, got {value:?}"),
        })?;

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        match MediaFile::from_rpc(server, entry) {
            Ok(file) => files.push(file),
            Err(field) => {
                tracing::warn!(
                    "File list from {} has an entry without '{}'; keeping {} entries",
                    server.name,
                    field,
                    files.len()
                );
                break;
            }
        }
    }
    Ok(files)
}
