#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModulePlayer,
    ConfigModuleAttention,
    PromptSelectModules,
    PromptApiUrl,
    PromptSongsUrl,
    PromptPreferredServer,
    PromptMetadataPollInterval,
    PromptMinRate,
    PromptJitterThreshold,
    PromptDistractionIncrement,
    PromptRecoveryDuration,
    PromptCalmThreshold,
    AttentionConfigInvalid(String),

    // === CHANNEL MESSAGES ===
    ChannelsFetchFailed(String),
    ChannelsNotFound,
    ChannelNotFound(String),
    ChannelsHeader(usize),
    NoPlaylistForChannel(String),
    StreamResolveFailed(String),
    StreamUrl(String),
    StreamMirrors,

    // === NOW PLAYING MESSAGES ===
    NowPlaying {
        artist: String,
        title: String,
        since: Option<String>,
    },
    NowPlayingUnknown,

    // === VOLUME MESSAGES ===
    VolumeSet(f64),
    VolumeCurrent(f64),

    // === WATCH MESSAGES ===
    WatchStarted { channel: String, volume: f64 },
    WatchStatus {
        score: f64,
        rate: f64,
        volume: f64,
        moving: bool,
        focused: bool,
        refused_rates: u64,
    },
    WatchShuttingDown,
    WatchStopped(f64),
    WatchReceivedSigint,
    WatchReceivedSigterm,
    WatchSignalHandlingNotSupported,
    SessionError(String),
}
