/// Value of the `Conventions` global attribute in every SOFA file
pub const SOFA_CONVENTIONS_VALUE: &str = "SOFA";

/// Oldest AES69 version accepted by the base rules
pub const MIN_SOFA_VERSION: f64 = 0.6;

/// Value of `RoomType` required by the free-field conventions
pub const FREE_FIELD: &str = "free field";

/// Placeholder written to `License` when the author gives none
pub const DEFAULT_LICENSE: &str = "No license provided, ask the author for permission";

/// Attribute name suffixes on position-bearing variables
pub const ATTR_TYPE: &str = "Type";
/// Units attribute on position, frequency and sampling-rate variables
pub const ATTR_UNITS: &str = "Units";

// Global attributes
/// `Conventions`
pub const ATTR_CONVENTIONS: &str = "Conventions";
/// `Version`
pub const ATTR_VERSION: &str = "Version";
/// `SOFAConventions`
pub const ATTR_SOFA_CONVENTIONS: &str = "SOFAConventions";
/// `SOFAConventionsVersion`
pub const ATTR_SOFA_CONVENTIONS_VERSION: &str = "SOFAConventionsVersion";
/// `APIName`
pub const ATTR_API_NAME: &str = "APIName";
/// `APIVersion`
pub const ATTR_API_VERSION: &str = "APIVersion";
/// `AuthorContact`
pub const ATTR_AUTHOR_CONTACT: &str = "AuthorContact";
/// `Organization`
pub const ATTR_ORGANIZATION: &str = "Organization";
/// `License`
pub const ATTR_LICENSE: &str = "License";
/// `DataType`
pub const ATTR_DATA_TYPE: &str = "DataType";
/// `RoomType`
pub const ATTR_ROOM_TYPE: &str = "RoomType";
/// `DateCreated`
pub const ATTR_DATE_CREATED: &str = "DateCreated";
/// `DateModified`
pub const ATTR_DATE_MODIFIED: &str = "DateModified";
/// `Title`
pub const ATTR_TITLE: &str = "Title";

// Variables
/// Listener position
pub const VAR_LISTENER_POSITION: &str = "ListenerPosition";
/// Listener view vector
pub const VAR_LISTENER_VIEW: &str = "ListenerView";
/// Listener up vector
pub const VAR_LISTENER_UP: &str = "ListenerUp";
/// Source position
pub const VAR_SOURCE_POSITION: &str = "SourcePosition";
/// Source view vector
pub const VAR_SOURCE_VIEW: &str = "SourceView";
/// Source up vector
pub const VAR_SOURCE_UP: &str = "SourceUp";
/// Receiver positions
pub const VAR_RECEIVER_POSITION: &str = "ReceiverPosition";
/// Receiver view vectors
pub const VAR_RECEIVER_VIEW: &str = "ReceiverView";
/// Receiver up vectors
pub const VAR_RECEIVER_UP: &str = "ReceiverUp";
/// Emitter positions
pub const VAR_EMITTER_POSITION: &str = "EmitterPosition";
/// Emitter view vectors
pub const VAR_EMITTER_VIEW: &str = "EmitterView";
/// Emitter up vectors
pub const VAR_EMITTER_UP: &str = "EmitterUp";
/// Impulse responses
pub const VAR_DATA_IR: &str = "Data.IR";
/// Sampling rate of the impulse responses
pub const VAR_DATA_SAMPLING_RATE: &str = "Data.SamplingRate";
/// Broadband delay per receiver
pub const VAR_DATA_DELAY: &str = "Data.Delay";
/// Real part of transfer functions
pub const VAR_DATA_REAL: &str = "Data.Real";
/// Imaginary part of transfer functions
pub const VAR_DATA_IMAG: &str = "Data.Imag";
/// Frequency axis of transfer functions
pub const VAR_FREQUENCY: &str = "N";
