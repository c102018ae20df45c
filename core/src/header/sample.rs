use super::*;

header_schema! {
    /// Sample header data (SDATA)
    pub struct SampleHeader {
        /// Block identifier; Range: 3 (Fixed)
        SHIDENT: u8[1],
        /// Sample bandwidth; Range: 0 represents 10kHz, 1 represents 20kHz
        SBANDW: u8[1],
        /// Original pitch; Range: 21 to 127 represents A1 to G8
        SPITCH: u8[1],
        /// Sample name
        SHNAME: String[12],
        /// Sample rate validity; 0 indicates rate is invalid, 128 indicates rate is valid
        SSRVLD: u8[1],
        /// Number of loops
        SLOOPS: u8[1],
        /// First active loop (internal use)
        SALOOP: u8[1],
        /// Highest loop (internal use)
        SHLOOP: u8[1],
        /// Playback type; 0 = Normal looping, 1 = Loop until release, 2 = No looping, 3 = Play to
        /// sample end
        SPTYPE: u8[1],
        /// Sample tuning offset cent:semi
        STUNO: u16[2],
        /// Absolute start address in memory of sample
        SLOCAT: u32[4],
        /// Length of sample
        SLNGTH: u32[4],
        /// Offset from start of sample from which playback commences
        SSTART: u32[4],
        /// Offset from start of sample from which playback ceases
        SMPEND: u32[4],
        /// Position in sample of first loop point
        LOOPAT1: u32[4],
        /// First loop length
        LLNGTH1: u64[6],
        /// Dwell time of first loop; Range: 0 represents No Loop, 9999 = Hold, 1 to 9998
        /// represents Dwell time in milliseconds
        LDWELL1: u16[2],
        /// Position in sample of second loop point
        LOOPAT2: u32[4],
        /// Second loop length
        LLNGTH2: u64[6],
        /// Dwell time of second loop; 0 represents No Loop, 9999 = Hold, 1 to 9998 represents
        /// Dwell time in milliseconds
        LDWELL2: u16[2],
        /// Position in sample of third loop point
        LOOPAT3: u32[4],
        /// Third loop length
        LLNGTH3: u64[6],
        /// Dwell time of third loop; 0 represents No Loop, 9999 = Hold, 1 to 9998 represents
        /// Dwell time in milliseconds
        LDWELL3: u16[2],
        /// Position in sample of fourth loop point
        LOOPAT4: u32[4],
        /// Fourth loop length
        LLNGTH4: u64[6],
        /// Dwell time of fourth loop; 0 represents No Loop, 9999 = Hold, 1 to 9998 represents
        /// Dwell time in milliseconds
        LDWELL4: u16[2],
        /// Relative loop factors for loop 1
        SLXY1: u128[12],
        /// Relative loop factors for loop 2
        SLXY2: u128[12],
        /// Relative loop factors for loop 3
        SLXY3: u128[12],
        /// Relative loop factors for loop 4
        SLXY4: u128[12],
        /// Used internally
        SSPARE: u8[1],
        /// Not used
        SWCOMM: u8[1],
        /// Address of stereo partner (internal use)
        SSPAIR: u16[2],
        /// Sample rate
        SSRATE: u16[2],
        /// Tuning offset of hold loop; Range: -50 to +50
        SHLTO: u8[1],
    }
}
