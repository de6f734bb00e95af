//! Opcode tables for the unified speaker protocol.
//! Every frame is `[opcode: 1 byte][payload...]`. Command and response opcodes
//! live in separate namespaces and reuse the same byte values.

// --- GATT layout (routing happens in the transport) ---

pub const SERVICE_UUID: &str = "12345678-1234-1234-1234-123456789000";
pub const CHAR_CMD_UUID: &str = "12345678-1234-1234-1234-123456789001";
pub const CHAR_STATUS_UUID: &str = "12345678-1234-1234-1234-123456789002";
pub const CHAR_METER_UUID: &str = "12345678-1234-1234-1234-123456789003";
pub const CCCD_UUID: &str = "00002902-0000-1000-8000-00805f9b34fb";

// --- Commands (phone -> speaker) ---

// Settings
pub const CMD_SET_EQ: u8 = 0x01; // [bass, mid, treble] signed
pub const CMD_SET_EQ_PRESET: u8 = 0x02; // [preset_id]
pub const CMD_SET_CONTROL: u8 = 0x03; // [control_byte]
pub const CMD_SET_NAME: u8 = 0x04; // [name...] up to 32 bytes
pub const CMD_SET_LED: u8 = 0x05; // [effect, bright, speed, r1, g1, b1, r2, g2, b2, gradient]
pub const CMD_SET_LED_EFFECT: u8 = 0x06; // [effect_id]
pub const CMD_SET_LED_BRIGHT: u8 = 0x07; // [brightness]

// Custom sounds
pub const CMD_SOUND_MUTE: u8 = 0x10; // [0/1]
pub const CMD_SOUND_DELETE: u8 = 0x11; // [type]
pub const CMD_SOUND_UP_START: u8 = 0x12; // [type, size: 3 bytes LE]
pub const CMD_SOUND_UP_DATA: u8 = 0x13; // [seq, data...]
pub const CMD_SOUND_UP_END: u8 = 0x14;

// Firmware update
pub const CMD_OTA_BEGIN: u8 = 0x20; // [size: 4 bytes LE]
pub const CMD_OTA_DATA: u8 = 0x21; // [seq, data...]
pub const CMD_OTA_END: u8 = 0x22;
pub const CMD_OTA_ABORT: u8 = 0x23;

pub const CMD_REQUEST_STATUS: u8 = 0xF0;
pub const CMD_PING: u8 = 0xFF;

// --- Responses (speaker -> phone) ---

pub const RESP_STATUS_EQ: u8 = 0x01; // [bass, mid, treble]
pub const RESP_STATUS_CONTROL: u8 = 0x02; // [control_byte]
pub const RESP_STATUS_NAME: u8 = 0x03; // [name...]
pub const RESP_STATUS_FW: u8 = 0x04; // [version...]
pub const RESP_STATUS_LED: u8 = 0x05; // 10 bytes, same layout as CMD_SET_LED
pub const RESP_STATUS_SOUND: u8 = 0x06; // [status_byte]

pub const RESP_ACK_OK: u8 = 0x10; // [cmd]
pub const RESP_ACK_ERROR: u8 = 0x11; // [cmd, error_code]

pub const RESP_OTA_PROGRESS: u8 = 0x20; // [percent]
pub const RESP_OTA_READY: u8 = 0x21;
pub const RESP_OTA_COMPLETE: u8 = 0x22;
pub const RESP_OTA_FAILED: u8 = 0x23; // [error_code]

pub const RESP_SOUND_PROGRESS: u8 = 0x30; // [percent]
pub const RESP_SOUND_READY: u8 = 0x31;
pub const RESP_SOUND_COMPLETE: u8 = 0x32;
pub const RESP_SOUND_FAILED: u8 = 0x33; // [error_code]

pub const RESP_FULL_STATUS: u8 = 0xF0;
pub const RESP_PONG: u8 = 0xFF;

// --- Device error codes ---

pub const ERR_NONE: u8 = 0x00;
pub const ERR_INVALID_CMD: u8 = 0x01;
pub const ERR_INVALID_PARAM: u8 = 0x02;
pub const ERR_BUSY: u8 = 0x03;
pub const ERR_OTA_INIT_FAIL: u8 = 0x10;
pub const ERR_OTA_WRITE_FAIL: u8 = 0x11;
pub const ERR_OTA_VERIFY_FAIL: u8 = 0x12;
pub const ERR_SOUND_INIT_FAIL: u8 = 0x20;
pub const ERR_SOUND_WRITE_FAIL: u8 = 0x21;

/// All opcodes the speaker accepts.
pub const COMMAND_OPCODES: [u8; 18] = [
    CMD_SET_EQ,
    CMD_SET_EQ_PRESET,
    CMD_SET_CONTROL,
    CMD_SET_NAME,
    CMD_SET_LED,
    CMD_SET_LED_EFFECT,
    CMD_SET_LED_BRIGHT,
    CMD_SOUND_MUTE,
    CMD_SOUND_DELETE,
    CMD_SOUND_UP_START,
    CMD_SOUND_UP_DATA,
    CMD_SOUND_UP_END,
    CMD_OTA_BEGIN,
    CMD_OTA_DATA,
    CMD_OTA_END,
    CMD_OTA_ABORT,
    CMD_REQUEST_STATUS,
    CMD_PING,
];

/// All opcodes the speaker may send back.
pub const RESPONSE_OPCODES: [u8; 18] = [
    RESP_STATUS_EQ,
    RESP_STATUS_CONTROL,
    RESP_STATUS_NAME,
    RESP_STATUS_FW,
    RESP_STATUS_LED,
    RESP_STATUS_SOUND,
    RESP_ACK_OK,
    RESP_ACK_ERROR,
    RESP_OTA_PROGRESS,
    RESP_OTA_READY,
    RESP_OTA_COMPLETE,
    RESP_OTA_FAILED,
    RESP_SOUND_PROGRESS,
    RESP_SOUND_READY,
    RESP_SOUND_COMPLETE,
    RESP_SOUND_FAILED,
    RESP_FULL_STATUS,
    RESP_PONG,
];

pub fn is_command(opcode: u8) -> bool {
    COMMAND_OPCODES.contains(&opcode)
}

pub fn is_response(opcode: u8) -> bool {
    RESPONSE_OPCODES.contains(&opcode)
}

/// Human-readable command name for logs.
pub fn command_name(opcode: u8) -> &'static str {
    match opcode {
        CMD_SET_EQ => "SET_EQ",
        CMD_SET_EQ_PRESET => "SET_EQ_PRESET",
        CMD_SET_CONTROL => "SET_CONTROL",
        CMD_SET_NAME => "SET_NAME",
        CMD_SET_LED => "SET_LED",
        CMD_SET_LED_EFFECT => "SET_LED_EFFECT",
        CMD_SET_LED_BRIGHT => "SET_LED_BRIGHT",
        CMD_SOUND_MUTE => "SOUND_MUTE",
        CMD_SOUND_DELETE => "SOUND_DELETE",
        CMD_SOUND_UP_START => "SOUND_UP_START",
        CMD_SOUND_UP_DATA => "SOUND_UP_DATA",
        CMD_SOUND_UP_END => "SOUND_UP_END",
        CMD_OTA_BEGIN => "OTA_BEGIN",
        CMD_OTA_DATA => "OTA_DATA",
        CMD_OTA_END => "OTA_END",
        CMD_OTA_ABORT => "OTA_ABORT",
        CMD_REQUEST_STATUS => "REQUEST_STATUS",
        CMD_PING => "PING",
        _ => "UNKNOWN",
    }
}
