//! Closed-but-tolerant wire vocabulary: `EventType` and `EventSubType`.
//!
//! Both are backed by a fixed set of known string spellings but preserve any
//! unrecognized spelling on the read path (`Other(String)`) rather than
//! failing to decode, per the forward-compatibility requirement in the wire
//! codec contract.

use std::fmt;

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            /// Any spelling not in the closed set above. The original string
            /// is preserved so the listener can log it and move on.
            Other(String),
        }

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(s) => s.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $wire => Self::$variant, )+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }
    };
}

string_enum! {
    /// Top-level discriminator of a frame's purpose.
    EventType {
        ApplicationUpdate => "APPLICATION_UPDATE",
        ApplicationUpdating => "APPLICATION_UPDATING",
        CommandCompleted => "COMMAND_COMPLETED",
        CommandExecute => "COMMAND_EXECUTE",
        CommandExecuting => "COMMAND_EXECUTING",
        DataGet => "DATA_GET",
        DataListenerRegistered => "DATA_LISTENER_REGISTERED",
        DataListenerUnregistered => "DATA_LISTENER_UNREGISTERED",
        DataUpdate => "DATA_UPDATE",
        Directories => "DIRECTORIES",
        Error => "ERROR",
        ExitApplication => "EXIT_APPLICATION",
        File => "FILE",
        Files => "FILES",
        GetData => "GET_DATA",
        GetDirectories => "GET_DIRECTORIES",
        GetFile => "GET_FILE",
        GetFiles => "GET_FILES",
        GetSettings => "GET_SETTINGS",
        KeyboardKeyPressed => "KEYBOARD_KEY_PRESSED",
        KeyboardKeypress => "KEYBOARD_KEYPRESS",
        KeyboardText => "KEYBOARD_TEXT",
        KeyboardTextSent => "KEYBOARD_TEXT_SENT",
        MediaControl => "MEDIA_CONTROL",
        Notification => "NOTIFICATION",
        NotificationSent => "NOTIFICATION_SENT",
        Open => "OPEN",
        Opened => "OPENED",
        PowerHibernate => "POWER_HIBERNATE",
        PowerHibernating => "POWER_HIBERNATING",
        PowerLock => "POWER_LOCK",
        PowerLocking => "POWER_LOCKING",
        PowerLoggingOut => "POWER_LOGGINGOUT",
        PowerLogout => "POWER_LOGOUT",
        PowerRestart => "POWER_RESTART",
        PowerRestarting => "POWER_RESTARTING",
        PowerShutdown => "POWER_SHUTDOWN",
        PowerShuttingDown => "POWER_SHUTTINGDOWN",
        PowerSleep => "POWER_SLEEP",
        PowerSleeping => "POWER_SLEEPING",
        RegisterDataListener => "REGISTER_DATA_LISTENER",
        SettingsUpdated => "SETTINGS_UPDATED",
        SettingsResult => "SETTINGS_RESULT",
        UnregisterDataListener => "UNREGISTER_DATA_LISTENER",
        UpdateSettings => "UPDATE_SETTINGS",
        /// Synthesized locally for fire-and-forget sends; never sent by a real server.
        NotApplicable => "N/A",
    }
}

string_enum! {
    /// Secondary discriminator carried on `ERROR` frames.
    EventSubType {
        BadDirectory => "BAD_DIRECTORY",
        BadFile => "BAD_FILE",
        BadJson => "BAD_JSON",
        BadPath => "BAD_PATH",
        BadRequest => "BAD_REQUEST",
        BadToken => "BAD_TOKEN",
        CommandNotFound => "COMMAND_NOT_FOUND",
        InvalidAction => "INVALID_ACTION",
        ListenerAlreadyRegistered => "LISTENER_ALREADY_REGISTERED",
        ListenerNotRegistered => "LISTENER_NOT_REGISTERED",
        MissingAction => "MISSING_ACTION",
        MissingBase => "MISSING_BASE",
        MissingKey => "MISSING_KEY",
        MissingModules => "MISSING_MODULES",
        MissingPath => "MISSING_PATH",
        MissingPathUrl => "MISSING_PATH_URL",
        MissingSetting => "MISSING_SETTING",
        MissingText => "MISSING_TEXT",
        MissingTitle => "MISSING_TITLE",
        MissingToken => "MISSING_TOKEN",
        MissingValue => "MISSING_VALUE",
        UnknownEvent => "UNKNOWN_EVENT",
        /// Synthesized by the request timeout path (§4.7); never sent by a real server.
        Timeout => "TIMEOUT",
    }
}

impl EventSubType {
    /// `BAD_API_KEY` is a legacy alias for `BAD_TOKEN`: accepted on the read
    /// path, never emitted. `From<&str>` alone would turn it into
    /// `Other("BAD_API_KEY")`, so authentication checks go through this
    /// helper instead of comparing `== EventSubType::BadToken` directly.
    #[must_use]
    pub fn is_bad_token(&self) -> bool {
        matches!(self, Self::BadToken) || matches!(self, Self::Other(s) if s == "BAD_API_KEY")
    }
}
