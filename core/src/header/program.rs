use super::*;

header_schema! {
    /// Program common data (PDATA). On disk the header starts one byte into
    /// the program file; keygroups follow at fixed offsets.
    pub struct ProgramHeader {
        /// Block address of first keygroup (internal use)
        KGRP1: u16[2],
        /// Name of program
        PRNAME: String[12],
        /// MIDI program number; Range: 0 to 128; After sending data to this parameter,
        /// Miscellaneous function BTSORT should be triggered to resort the list of programs into
        /// order and to flag active programs.
        PRGNUM: u8[1],
        /// MIDI channel; Range: 255 signifies OMNI, 0 to 15 indicate MIDI channel
        PMCHAN: u8[1],
        /// Depth of polyphony; Range: 0 to 31 (these represent polyphony values of 1 to 32)
        POLYPH: u8[1],
        /// Priority of voices playing this program; Range: 0=low, 1=norm, 2=high, 3=hold
        PRIORT: u8[1],
        /// Lower limit of play range; Range: 21 to 127 represents A1 to G8
        PLAYLO: u8[1],
        /// Upper limit of play range
        PLAYHI: u8[1],
        /// Not used
        OSHIFT: u8[1],
        /// Individual output routing. This parameter also controls send to effects section.
        OUTPUT: u8[1],
        /// Left and right output levels; Range: 0 to 99
        STEREO: u8[1],
        /// Balance between left and right outputs; Range: -50 to +50
        PANPOS: u8[1],
        /// Basic loudness of this program; Range: 0 to 99
        PRLOUD: u8[1],
        /// Note-on velocity dependence of loudness; Range: -50 to +50
        V_LOUD: u8[1],
        /// Not used
        K_LOUD: u8[1],
        /// Not used
        P_LOUD: u8[1],
        /// Speed of LFO2; 0 to 99
        PANRAT: u8[1],
        /// Depth of LFO2
        PANDEP: u8[1],
        /// Delay in growth of LFO2
        PANDEL: u8[1],
        /// Not used
        K_PANP: u8[1],
        /// Speed of LFO1
        LFORAT: u8[1],
        /// Depth of LFO1
        LFODEP: u8[1],
        /// Delay in growth of LFO1
        LFODEL: u8[1],
        /// Amount of control of LFO1 depth by Modwheel
        MWLDEP: u8[1],
        /// Amount of control of LFO1 depth by Aftertouch
        PRSDEP: u8[1],
        /// Amount of control of LFO1 depth by Note-On velocity
        VELDEP: u8[1],
        /// Range of increase of Pitch by bendwheel
        B_PTCH: u8[1],
        /// Amount of control of Pitch by Pressure
        P_PTCH: u8[1],
        /// Keygroup crossfade enable
        KXFADE: u8[1],
        /// Number of keygroups. To change the number of keygroups in a program, the KDATA and
        /// DELK commands should be used.
        GROUPS: u8[1],
        /// Temporary program number (internal use)
        TPNUM: u8[1],
        /// Key temperament C, C#, D, D# etc.
        TEMPER: String[12],
        /// Not used
        ECHOUT: u8[1],
        /// Not used
        MW_PAN: u8[1],
        /// Not used
        COHERE: u8[1],
        /// Enable de-synchronisation of LFO1 across notes;  0 represents OFF, 1 represents ON
        DESYNC: u8[1],
        /// Not used
        PLAW: u8[1],
        /// Criterion by which voices are stolen; 0 represents OLDEST, 1 represents QUIETEST
        VASSOQ: u8[1],
        /// Reduction in loudness due to soft pedal
        SPLOUD: u8[1],
        /// Stretch of attack due to soft pedal
        SPATT: u8[1],
        /// Reduction of filter frequency due to soft pedal
        SPFILT: u8[1],
        /// Tuning offset of program; -50.00 to +50.00 (fraction is binary)
        PTUNO: u16[2],
        /// Not used
        K_LRAT: u8[1],
        /// Not used
        K_LDEP: u8[1],
        /// Not used
        K_LDEL: u8[1],
        /// Level sent to Individual outputs/effects
        VOSCL: u8[1],
        /// Not used
        VSSCL: u8[1],
        /// Mono legato mode enable; 0 represents OFF, 1 represents ON
        LEGATO: u8[1],
        /// Range of decrease of Pitch by bendwheel
        B_PTCHD: u8[1],
        /// Bending of held notes; 0 represents NORMAL mode, 1 represents HELD mode
        B_MODE: u8[1],
        /// Shift pitch of incoming MIDI
        TRANSPOSE: u8[1],
        /// First source of assignable modulation of pan position
        MODSPAN1: u8[1],
        /// Second source of assignable modulation of pan
        MODSPAN2: u8[1],
        /// Third source of assignable modulation of pan
        MODSPAN3: u8[1],
        /// First source of assignable modulation of loudness
        MODSAMP1: u8[1],
        /// Second source of assignable modulation of loudness
        MODSAMP2: u8[1],
        /// Source of assignable modulation of LFO1 speed
        MODSLFOT: u8[1],
        /// Source of assignable modulation of LFO1 depth
        MODSLFOL: u8[1],
        /// Source of assignable modulation of LFO1 delay
        MODSLFOD: u8[1],
        /// First source of assignable modulation of filter frequency
        MODSFILT1: u8[1],
        /// Second source of assignable modulation of filter frequency
        MODSFILT2: u8[1],
        /// Third source of assignable modulation of filter frequency
        MODSFILT3: u8[1],
        /// Source of assignable modulation of pitch
        MODSPITCH: u8[1],
        /// Third source of assignable modulation of loudness
        MODSAMP3: u8[1],
        /// Amount of control of pan by assignable source 1
        MODVPAN1: u8[1],
        /// Amount of control of pan by assignable source 2
        MODVPAN2: u8[1],
        /// Amount of control of pan by assignable source 3
        MODVPAN3: u8[1],
        /// Amount of control of loudness by assignable source 1
        MODVAMP1: u8[1],
        /// Amount of control of loudness by assignable source 2
        MODVAMP2: u8[1],
        /// Amount of control of LFO1 speed
        MODVLFOR: u8[1],
        /// Amount of control of LFO1 depth
        MODVLVOL: u8[1],
        /// Amount of control of LFO1 delay
        MODVLFOD: u8[1],
        /// LFO1 waveform; 0 represents Triangle, 1 represents Sawtooth, 2 represents Square
        LFO1WAVE: u8[1],
        /// LFO2 waveform
        LFO2WAVE: u8[1],
        /// First source of assignable modulation of filter 2 frequency (only used on S3200).
        MODSLFLT2_1: u8[1],
        /// Second source of assignable modulation of filter 2 frequency (only used on S3200).
        MODSLFLT2_2: u8[1],
        /// Third source of assignable modulation of filter 2 frequency (only used on S3200).
        MODSLFLT2_3: u8[1],
        /// Retrigger mode for LFO2
        LFO2TRIG: u8[1],
        /// Not used
        RESERVED_1: u64[7],
        /// PORTAMENTO TIME
        PORTIME: u8[1],
        /// PORTAMENTO TYPE
        PORTYPE: u8[1],
        /// PORTAMENTO ON/OFF
        PORTEN: u8[1],
        /// Effects Bus Select; 0 to 4
        PFXCHAN: u8[1],
    }
}
