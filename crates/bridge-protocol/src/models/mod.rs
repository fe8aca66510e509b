pub mod data;
pub mod execute;
pub mod keyboard;
pub mod media;
pub mod notification;
pub mod open;
pub mod system;
pub mod telemetry;

pub use data::{GenericResponse, GetData, ModulesData, RegisterDataListener, Update};
pub use execute::{ExecuteRequest, ExecuteResult};
pub use keyboard::{KeyboardKey, KeyboardText};
pub use media::{MediaControl, MediaDirectory, MediaFile, MediaFiles, MediaGetFile, MediaGetFiles};
pub use notification::{Action, Audio, Notification};
pub use open::{OpenPath, OpenUrl};
pub use system::{RunMode, System, SystemUser};
pub use telemetry::{Battery, Cpu, Disks, Display, Gpu, Media, Memory, Networks, Process, Sensors};
