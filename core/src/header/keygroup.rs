use super::*;

header_schema! {
    /// Keygroup data (KDATA), including the four velocity zones
    pub struct KeygroupHeader {
        /// Block identifier (internal use); Should equal 2
        KGIDENT: u8[1],
        /// Next keygroup block address (internal use)
        NXTKG: u16[2],
        /// Lower limit of keyrange; Range: 21 to 127 represents A1 to G8
        LONOTE: u8[1],
        /// Upper limit of keyrange
        HINOTE: u8[1],
        /// Keygroup tuning offset; Range: -50.00 to +50.00 (fraction is binary)
        KGTUNO: u16[2],
        /// Basic filter frequency; Range: 0 to 99
        FILFRQ: u8[1],
        /// Key follow of filter frequency
        K_FREQ: u8[1],
        /// Not used
        V_FREQ: u8[1],
        /// Note used
        P_FREQ: u8[1],
        /// Not used
        E_FREQ: u8[1],
        /// Attack rate of envelope 1; 0-99
        ATTAK1: u8[1],
        /// Decay rate of envelope 1; 0-99
        DECAY1: u8[1],
        /// Sustain level of envelope 1
        SUSTN1: u8[1],
        /// Release rate of envelope 1
        RELSE1: u8[1],
        /// Note-on velocity dependence of envelope 1 attack rate; Range: -50 to +50
        V_ATT1: u8[1],
        /// Note-on velocity dependence of envelope 1 release rate
        V_REL1: u8[1],
        /// Note-off velocity dependence of envelope 1 release rate
        O_REL1: u8[1],
        /// Dependence of envelope 2 decay and release rates on key
        K_DAR1: u8[1],
        /// Attack rate of envelope 2: 0-99
        ENV2R1: u8[1],
        /// Decay rate of envelope 2
        ENV2R3: u8[1],
        /// Sustain level of envelope 2
        ENV2L3: u8[1],
        /// Release rate of envelope 2
        ENV2R4: u8[1],
        /// Dependence of envelope 2 attack on note-on velocity; Range: -50 to 50
        V_ATT2: u8[1],
        /// Dependence of envelope 2 release on note-on velocity
        V_REL2: u8[1],
        /// Dependence of envelope 2 release on note-off velocity
        O_REL2: u8[1],
        /// Dependence of envelope 2 decay and release rates on key
        K_DAR2: u8[1],
        /// Scaling of envelope 2 by note-on velocity
        V_ENV2: u8[1],
        /// Not used
        E_PTCH: u8[1],
        /// Velocity zone crossfade; Range: 0 represents OFF, 1 represents ON
        VXFADE: u8[1],
        /// Not used
        VZONES: u8[1],
        /// Calculated left keygroup crossfade factor (internal)
        LKXF: u8[1],
        /// Calculated right keygroup crossfade factor (internal)
        RKXF: u8[1],
        /// Sample name used in velocity zone 1
        SNAME1: String[12],
        /// Lower limit of velocity range; 0-127
        LOVEL1: u8[1],
        /// Upper limit of velocity range
        HIVEL1: u8[1],
        /// Velocity zone 1 tuning offset; Range: -50.00 to +50.00 (fraction is binary)
        VTUNO1: u16[2],
        /// Velocity zone 1 loudness offset; Range: -50 to +50
        VLOUD1: u8[1],
        /// Velocity zone 1 filter frequency offset
        VFREQ1: u8[1],
        /// Velocity zone 1 pan offset
        VPANO1: u8[1],
        /// Type of sample playback in velocity zone 1; 0 = As sample, 1 = Loop in release, 2 =
        /// Loop til release, 3 = No loops, 4 = Play to sample end
        ZPLAY1: u8[1],
        /// Low velocity crossfade factor (internal use)
        LVXF1: u8[1],
        /// High velocity crossfade factor (internal use)
        HVXF1: u8[1],
        /// Calculated sample header block address (internal)
        SBADD1: u16[2],
        /// Sample name used in velocity zone 2
        SNAME2: String[12],
        /// Lower limit of velocity range 2
        LOVEL2: u8[1],
        /// Upper limit of velocity range 2
        HIVEL2: u8[1],
        /// Velocity zone 2 tuning offset; Range: -50.00 to +50.00 (fraction is binary)
        VTUNO2: u16[2],
        /// Velocity zone 2 loudness offset
        VLOUD2: u8[1],
        /// Velocity zone 2 filter frequency offset
        VFREQ2: u8[1],
        /// Velocity zone 2 pan offset
        VPANO2: u8[1],
        /// Type of sample playback in velocity zone 2; see ZPLAY1
        ZPLAY2: u8[1],
        /// Low velocity crossfade factor (internal use)
        LVXF2: u8[1],
        /// High velocity crossfade factor (internal use)
        HVXF2: u8[1],
        /// Calculated sample header block address (internal)
        SBADD2: u16[2],
        /// Sample name used in velocity zone 3
        SNAME3: String[12],
        /// Lower limit of velocity range 3
        LOVEL3: u8[1],
        /// Upper limit of velocity range 3
        HIVEL3: u8[1],
        /// Velocity zone 3 tuning offset; Range: -50.00 to +50.00 (fraction is binary)
        VTUNO3: u16[2],
        /// Velocity zone 3 loudness offset; -50 to +50
        VLOUD3: u8[1],
        /// Velocity zone 3 filter frequency offset
        VFREQ3: u8[1],
        /// Velocity zone 3 pan offset
        VPANO3: u8[1],
        /// Type of sample playback in velocity zone 3; See ZPLAY1
        ZPLAY3: u8[1],
        /// Low velocity crossfade factor (internal use)
        LVXF3: u8[1],
        /// High velocity crossfade factor (internal use)
        HVXF3: u8[1],
        /// Calculated sample header block address (internal)
        SBADD3: u16[2],
        /// Sample name used in velocity zone 4
        SNAME4: String[12],
        /// Lower limit of velocity range 4
        LOVEL4: u8[1],
        /// Upper limit of velocity range 4
        HIVEL4: u8[1],
        /// Velocity zone 4 tuning offset; Range: -50.00 to +50.00 (fraction is binary)
        VTUNO4: u16[2],
        /// Velocity zone 4 loudness offset
        VLOUD4: u8[1],
        /// Velocity zone 4 filter frequency offset
        VFREQ4: u8[1],
        /// Velocity zone 4 pan offset
        VPANO4: u8[1],
        /// Type of sample playback in velocity zone 4; See ZPLAY1
        ZPLAY4: u8[1],
        /// Low velocity crossfade factor (internal use)
        LVXF4: u8[1],
        /// High velocity crossfade factor (internal use)
        HVXF4: u8[1],
        /// Calculated sample header block address (internal)
        SBADD4: u16[2],
        /// Fixed rate detune; -50 to 50
        KBEAT: u8[1],
        /// Remain in attack phase until first loop encountered; Range: 0 represents OFF, 1
        /// represents ON
        AHOLD: u8[1],
        /// Constant pitch flag for velocity zone 1; 0 represents TRACK, 1 represents CONST
        CP1: u8[1],
        /// Constant pitch flag for velocity zone 2
        CP2: u8[1],
        /// Constant pitch flag for velocity zone 3
        CP3: u8[1],
        /// Constant pitch flag for velocity zone 4
        CP4: u8[1],
        /// Individual output offset for velocity zone 1
        VZOUT1: u8[1],
        /// Individual output offset for velocity zone 2
        VZOUT2: u8[1],
        /// Individual output offset for velocity zone 3
        VZOUT3: u8[1],
        /// Individual output offset for velocity zone 4
        VZOUT4: u8[1],
        /// Start point dependence on note-on velocity for sample in velocity zone 1; Range: -9999
        /// to +9999 data points
        VSS1: u16[2],
        /// Start point dependence on note-on velocity for sample in velocity zone 2
        VSS2: u16[2],
        /// Start point dependence on note-on velocity for sample in velocity zone 3
        VSS3: u16[2],
        /// Start point dependence on note-on velocity for sample in velocity zone 4
        VSS4: u16[2],
        /// Not used
        KV_LO: u8[1],
        /// Resonance of filter 1; Range: 0 to 15
        FILQ: u8[1],
        /// Amount of control of pitch by LFO1; -50 to +50
        L_PTCH: u8[1],
        /// Amount of control of filter frequency by assignable source 1
        MODVFILT1: u8[1],
        /// Amount of control of filter frequency by assignable source 2
        MODVFILT2: u8[1],
        /// Amount of control of filter frequency by assignable source 3
        MODVFILT3: u8[1],
        /// Amount of control of pitch by assignable source
        MODVPITCH: u8[1],
        /// Amount of control of loudness by assignable keygroup source
        MODVAMP3: u8[1],
        /// Level of envelope 2 at end attack phase (phase 1); 0-99
        ENV2L1: u8[1],
        /// Rate during phase 2 of envelope 2
        ENV2R2: u8[1],
        /// Level of envelope 2 at end of phase 1
        ENV2L2: u8[1],
        /// Final envelope 2 level
        ENV2L4: u8[1],
        /// Keygroup mute group; Range: 0ffh = off, mute groups 0 to 31
        KGMUTE: u8[1],
        /// Effects bus select
        PFXCHAN: u8[1],
        /// Effects send level
        PFXSLEV: u8[1],
        /// Not used
        Reserved_1: u64[5],
        /// Route audio through second LSI; Range: 0 = -6dB, 1 = 0dB
        LSI2_ON: u8[1],
        /// Make-up gain of second filter; Range: 0 = -6dB, 1 = 0dB
        FLT2GAIN: u8[1],
        /// Mode of second filter; Range: 0 = Low-pass, 1 = Band-pass, 2 = High-pass, 3 = EQ
        FLT2MODE: u8[1],
        /// Resonance of second filter; Range: 0 to 31
        FLT2Q: u8[1],
        /// Center frequency of tone section
        TONEFREQ: u8[1],
        /// Slope of tone section
        TONESLOP: u8[1],
        /// Amount of control of second filter frequency by source 1
        MODVFLT2_1: u8[1],
        /// Amount of control of second filter frequency by source 2
        MODVFLT2_2: u8[1],
        /// Amount of control of second filter frequency by source 3
        MODVFLT2_3: u8[1],
        /// Basic second filter frequency; 0-99
        FIL2FR: u8[1],
        /// Second filter key follow; Range: -24 to +24 semitones
        K_FRQ2: u8[1],
        /// Attack rate of envelope 3
        ATTAK3: u8[1],
        /// Final level of attack phase (phase 1) of envelope 3
        ENV3L1: u8[1],
        /// Rate of phase 2 of envelope 3
        ENV3R2: u8[1],
        /// Final level of phase 2 of envelope 3
        ENV3L2: u8[1],
        /// Rate of phase 3 of envelope 3
        ENV3R3: u8[1],
        /// Final level of phase 3 of envelope 3
        ENV3L3: u8[1],
        /// Rate of release phase (phase 4) of envelope 3
        ENV3R4: u8[1],
        /// Final target level of envelope 3
        ENV3L4: u8[1],
        /// Dependence of envelope 3 attack rate on note-on velocity
        V_ATT3: u8[1],
        /// Dependence of envelope 3 release rate on note-on velocity
        V_REL3: u8[1],
        /// Dependence of envelope 3 release rate on note-off velocity
        O_REL3: u8[1],
        /// Dependence of envelope 3 release and decay rate on key
        K_DAR3: u8[1],
        /// Scaling of envelope 3 by note-on velocity
        V_ENV3: u8[1],
        /// Keygroup override Effects Bus select; Range: 0 to 5
        KFXCHAN: u8[1],
        /// Keygroup override Effects Send level; Range: 0 to 99
        KFXSLEV: u8[1],
    }
}
