use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Standard sound names from the freedesktop sound theme, usable as the
/// `sound-name` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SoundName {
    AlarmClockElapsed,
    AudioChannelFrontCenter,
    AudioChannelFrontLeft,
    AudioChannelFrontRight,
    AudioChannelRearCenter,
    AudioChannelRearLeft,
    AudioChannelRearRight,
    AudioChannelSideLeft,
    AudioChannelSideRight,
    AudioTestSignal,
    AudioVolumeChange,
    Bell,
    CameraShutter,
    Complete,
    DeviceAdded,
    DeviceRemoved,
    DialogError,
    DialogInformation,
    DialogWarning,
    Message,
    MessageNewInstant,
    NetworkConnectivityEstablished,
    NetworkConnectivityLost,
    PhoneIncomingCall,
    PhoneOutgoingBusy,
    PhoneOutgoingCalling,
    PowerPlug,
    PowerUnplug,
    ScreenCapture,
    ServiceLogin,
    ServiceLogout,
    SuspendError,
    TrashEmpty,
    WindowAttention,
    WindowQuestion,
}
