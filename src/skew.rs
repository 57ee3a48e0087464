//! ## Sector Skewing Module
//!
//! DOS 3.3 writes sector addresses on the track in physical order and applies its
//! skew in software.  These tables map between the two orderings.  The disk image
//! assembly in `track` lays sectors out in logical order, so logical sector `i` of
//! a track is the payload of physical sector `DOS_LSEC_TO_DOS_PSEC[i]`.

/// Translate DOS 3.3 logical sector to physical sector
pub const DOS_LSEC_TO_DOS_PSEC: [usize;16] = [0,13,11,9,7,5,3,1,14,12,10,8,6,4,2,15];
/// Translate DOS 3.3 physical sector to logical sector
pub const DOS_PSEC_TO_DOS_LSEC: [usize;16] = [0,7,14,6,13,5,12,4,11,3,10,2,9,1,8,15];

#[test]
fn skew_tables_are_inverse() {
    for log in 0..16 {
        assert_eq!(DOS_PSEC_TO_DOS_LSEC[DOS_LSEC_TO_DOS_PSEC[log]],log);
    }
}
