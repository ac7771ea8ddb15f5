//! Primary temperature and fan backend: the Apple SMC.
//!
//! The System Management Controller exposes named 4-character keys. CPU and
//! GPU die sensors use different key sets per chip generation because the
//! register layouts differ across families; rather than detect the
//! generation, every known key across every generation is tried on each read
//! and the maximum plausible value wins (unpopulated keys simply miss).
//!
//! The register decode paths are pure and platform-independent; the IOKit
//! client below them is macOS-only.

use crate::core::thermal::is_plausible_temperature;

/// Pack a 4-character key the way the SMC expects it.
pub const fn four_cc(key: &str) -> u32 {
    let b = key.as_bytes();
    ((b[0] as u32) << 24) | ((b[1] as u32) << 16) | ((b[2] as u32) << 8) | (b[3] as u32)
}

/// SMC data types this reader decodes.
pub const TYPE_FLT: u32 = four_cc("flt ");
pub const TYPE_FPE2: u32 = four_cc("fpe2");
pub const TYPE_SP78: u32 = four_cc("sp78");

// CPU/GPU temperature keys by chip generation.
const M1_KEYS: &[&str] = &[
    "Tp09", "Tp0T", // Efficiency CPU cores
    "Tp01", "Tp05", "Tp0D", "Tp0H", "Tp0L", "Tp0P", "Tp0X", "Tp0b", // Performance CPU cores
    "Tg05", "Tg0D", "Tg0L", "Tg0T", // GPU
];
// M1/M2 Pro/Max/Ultra use TC## keys for CPU cores instead of Tp##
const M_PRO_MAX_KEYS: &[&str] = &[
    // CPU
    "TC10", "TC11", "TC12", "TC13", "TC20", "TC21", "TC22", "TC23", "TC30", "TC31", "TC32",
    "TC33", "TC40", "TC41", "TC42", "TC43", "TC50", "TC51", "TC52", "TC53",
    // GPU
    "Tg04", "Tg05", "Tg0C", "Tg0D", "Tg0K", "Tg0L", "Tg0S", "Tg0T",
];
const M2_KEYS: &[&str] = &[
    "Tp1h", "Tp1t", "Tp1p", "Tp1l", // Efficiency CPU cores
    "Tp01", "Tp05", "Tp09", "Tp0D", "Tp0X", "Tp0b", "Tp0f", "Tp0j", // Performance CPU cores
    "Tg0f", "Tg0j", // GPU
];
const M3_KEYS: &[&str] = &[
    "Te05", "Te0L", "Te0P", "Te0S", // Efficiency CPU cores
    "Tf04", "Tf09", "Tf0A", "Tf0B", "Tf0D", "Tf0E", "Tf44", "Tf49", "Tf4A", "Tf4B", "Tf4D",
    "Tf4E", // Performance CPU cores
    "Tf14", "Tf18", "Tf19", "Tf1A", "Tf24", "Tf28", "Tf29", "Tf2A", // GPU
];
const M4_KEYS: &[&str] = &[
    "Te05", "Te0S", "Te09", "Te0H", // Efficiency CPU cores
    "Tp01", "Tp05", "Tp09", "Tp0D", "Tp0V", "Tp0Y", "Tp0b", "Tp0e", // Performance CPU cores
    "Tg0G", "Tg0H", "Tg1U", "Tg1k", "Tg0K", "Tg0L", "Tg0d", "Tg0e", "Tg0j", "Tg0k", // GPU
];

/// All known generations; scanned in full on every temperature read.
pub const GENERATION_KEYS: &[&[&str]] = &[M1_KEYS, M_PRO_MAX_KEYS, M2_KEYS, M3_KEYS, M4_KEYS];

/// Raw bytes read back for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmcValue {
    pub bytes: [u8; 32],
    pub size: usize,
    pub data_type: u32,
}

/// Decode a register value by its reported byte width.
///
/// 4 bytes decode as an IEEE little-endian float (`flt`, Apple Silicon);
/// 2 bytes decode as legacy fixed point, `fpe2` (unsigned big-endian / 4) or
/// `sp78` (signed big-endian / 256). Anything else is rejected.
pub fn decode_value(value: &SmcValue) -> Option<f32> {
    match value.size {
        4 => {
            let raw = [value.bytes[0], value.bytes[1], value.bytes[2], value.bytes[3]];
            Some(f32::from_le_bytes(raw))
        }
        2 => {
            let raw = [value.bytes[0], value.bytes[1]];
            match value.data_type {
                TYPE_FPE2 => Some(u16::from_be_bytes(raw) as f32 / 4.0),
                TYPE_SP78 => Some(i16::from_be_bytes(raw) as f32 / 256.0),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Decode a temperature key, applying the plausibility filter.
///
/// Garbage register contents decode fine but land outside (20, 150) °C and
/// are discarded here rather than reported as bogus readings.
pub fn decode_temperature(value: &SmcValue) -> Option<f32> {
    decode_value(value).filter(|&v| is_plausible_temperature(v))
}

#[cfg(target_os = "macos")]
pub use macos::{SmcClient, SmcFanSource, SmcTemperatureSource};

#[cfg(target_os = "macos")]
mod macos {
    use std::ffi::CString;
    use std::sync::Arc;

    use libc::{c_char, c_void};
    use log::warn;

    use crate::core::thermal::{
        FanReading, FanSource, TemperatureReading, TemperatureSource,
    };

    use super::{decode_temperature, decode_value, four_cc, SmcValue, GENERATION_KEYS};

    type KernReturn = i32;
    type MachPort = u32;
    type IoObject = MachPort;
    type IoConnect = MachPort;
    type IoIterator = MachPort;

    const KERN_SUCCESS: KernReturn = 0;
    const KERNEL_INDEX_SMC: u32 = 2;
    const SMC_CMD_READ_BYTES: u8 = 5;
    const SMC_CMD_READ_KEYINFO: u8 = 9;

    #[link(name = "IOKit", kind = "framework")]
    extern "C" {
        fn IOServiceMatching(name: *const c_char) -> *mut c_void;
        fn IOServiceGetMatchingServices(
            main_port: MachPort,
            matching: *mut c_void,
            existing: *mut IoIterator,
        ) -> KernReturn;
        fn IOIteratorNext(iterator: IoIterator) -> IoObject;
        fn IOObjectRelease(object: IoObject) -> KernReturn;
        fn IOServiceOpen(
            service: IoObject,
            owning_task: MachPort,
            conn_type: u32,
            connect: *mut IoConnect,
        ) -> KernReturn;
        fn IOServiceClose(connect: IoConnect) -> KernReturn;
        fn IOConnectCallStructMethod(
            connection: IoConnect,
            selector: u32,
            input: *const c_void,
            input_size: usize,
            output: *mut c_void,
            output_size: *mut usize,
        ) -> KernReturn;
    }

    extern "C" {
        static mach_task_self_: MachPort;
    }

    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    struct SmcVersion {
        major: u8,
        minor: u8,
        build: u8,
        reserved: u8,
        release: u16,
    }

    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    struct SmcPLimitData {
        version: u16,
        length: u16,
        cpu_plimit: u32,
        gpu_plimit: u32,
        mem_plimit: u32,
    }

    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    struct SmcKeyInfo {
        data_size: u32,
        data_type: u32,
        data_attributes: u8,
    }

    #[repr(C)]
    #[derive(Clone, Copy, Default)]
    struct SmcKeyData {
        key: u32,
        vers: SmcVersion,
        p_limit: SmcPLimitData,
        key_info: SmcKeyInfo,
        result: u8,
        status: u8,
        data8: u8,
        data32: u32,
        bytes: [u8; 32],
    }

    /// One shared connection to the AppleSMC service.
    ///
    /// Connects once at construction; a failed open is sticky and every read
    /// through it returns None for the rest of the process. Closed exactly
    /// once on drop.
    pub struct SmcClient {
        conn: IoConnect,
        connected: bool,
    }

    // The connection handle is just a mach port; calls carry their own buffers.
    unsafe impl Send for SmcClient {}
    unsafe impl Sync for SmcClient {}

    impl SmcClient {
        pub fn new() -> Self {
            match Self::connect() {
                Some(conn) => Self {
                    conn,
                    connected: true,
                },
                None => {
                    warn!("AppleSMC unavailable; primary temperature/fan readings disabled");
                    Self {
                        conn: 0,
                        connected: false,
                    }
                }
            }
        }

        fn connect() -> Option<IoConnect> {
            let service_name = CString::new("AppleSMC").ok()?;
            unsafe {
                let matching = IOServiceMatching(service_name.as_ptr());
                if matching.is_null() {
                    return None;
                }

                let mut iterator: IoIterator = 0;
                // Passing 0 targets the default main port.
                if IOServiceGetMatchingServices(0, matching, &mut iterator) != KERN_SUCCESS {
                    return None;
                }

                let device = IOIteratorNext(iterator);
                IOObjectRelease(iterator);
                if device == 0 {
                    return None;
                }

                let mut conn: IoConnect = 0;
                let open_result = IOServiceOpen(device, mach_task_self_, 0, &mut conn);
                IOObjectRelease(device);

                (open_result == KERN_SUCCESS).then_some(conn)
            }
        }

        fn call(&self, input: &SmcKeyData) -> Option<SmcKeyData> {
            let mut output = SmcKeyData::default();
            let mut output_size = std::mem::size_of::<SmcKeyData>();
            let result = unsafe {
                IOConnectCallStructMethod(
                    self.conn,
                    KERNEL_INDEX_SMC,
                    input as *const SmcKeyData as *const c_void,
                    std::mem::size_of::<SmcKeyData>(),
                    &mut output as *mut SmcKeyData as *mut c_void,
                    &mut output_size,
                )
            };
            (result == KERN_SUCCESS).then_some(output)
        }

        /// Read one key's raw bytes plus its reported size and type.
        pub fn read_key(&self, key: &str) -> Option<SmcValue> {
            if !self.connected || key.len() != 4 {
                return None;
            }

            let mut input = SmcKeyData {
                key: four_cc(key),
                data8: SMC_CMD_READ_KEYINFO,
                ..Default::default()
            };
            let info = self.call(&input)?;

            let size = info.key_info.data_size;
            if size == 0 || size > 32 {
                return None;
            }

            input.key_info.data_size = size;
            input.data8 = SMC_CMD_READ_BYTES;
            let data = self.call(&input)?;

            Some(SmcValue {
                bytes: data.bytes,
                size: size as usize,
                data_type: info.key_info.data_type,
            })
        }

        fn read_float(&self, key: &str) -> Option<f32> {
            self.read_key(key).as_ref().and_then(decode_value)
        }

        fn read_u8(&self, key: &str) -> Option<u8> {
            let value = self.read_key(key)?;
            (value.size >= 1).then_some(value.bytes[0])
        }
    }

    impl Default for SmcClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for SmcClient {
        fn drop(&mut self) {
            if self.connected {
                unsafe {
                    IOServiceClose(self.conn);
                }
                self.connected = false;
            }
        }
    }

    /// Primary CPU die temperature: max plausible value across every known
    /// key of every chip generation.
    pub struct SmcTemperatureSource {
        client: Arc<SmcClient>,
    }

    impl SmcTemperatureSource {
        pub fn new(client: Arc<SmcClient>) -> Self {
            Self { client }
        }
    }

    impl TemperatureSource for SmcTemperatureSource {
        fn read_cpu_temperature(&mut self) -> Option<TemperatureReading> {
            let mut best: Option<(f32, &'static str)> = None;
            for generation in GENERATION_KEYS {
                for &key in *generation {
                    let Some(value) = self.client.read_key(key) else {
                        continue;
                    };
                    let Some(temp) = decode_temperature(&value) else {
                        continue;
                    };
                    if best.is_none_or(|(b, _)| temp > b) {
                        best = Some((temp, key));
                    }
                }
            }
            best.map(|(celsius, key)| TemperatureReading {
                celsius,
                source: key.to_string(),
            })
        }
    }

    /// Aggregate fan speed from per-fan actual/max registers.
    pub struct SmcFanSource {
        client: Arc<SmcClient>,
        /// Fan count cannot change at runtime; read once.
        fan_count: Option<u32>,
    }

    impl SmcFanSource {
        pub fn new(client: Arc<SmcClient>) -> Self {
            Self {
                client,
                fan_count: None,
            }
        }

        fn fan_count(&mut self) -> u32 {
            if let Some(count) = self.fan_count {
                return count;
            }
            let count = self.client.read_u8("FNum").map(u32::from).unwrap_or(0);
            self.fan_count = Some(count);
            count
        }
    }

    impl FanSource for SmcFanSource {
        fn read_fan(&mut self) -> Option<FanReading> {
            let count = self.fan_count();
            if count == 0 {
                return None;
            }

            let mut total_rpm = 0.0f32;
            let mut total_percent = 0.0f32;
            let mut valid = 0u32;

            for i in 0..count {
                let actual = self.client.read_float(&format!("F{i}Ac"));
                let max = self.client.read_float(&format!("F{i}Mx"));
                if let (Some(actual), Some(max)) = (actual, max) {
                    if max > 0.0 {
                        total_rpm += actual;
                        total_percent += (actual / max) * 100.0;
                        valid += 1;
                    }
                }
            }

            if valid == 0 {
                return None;
            }

            Some(FanReading {
                rpm: total_rpm / valid as f32,
                percent: (total_percent / valid as f32).min(100.0),
            })
        }
    }
}
