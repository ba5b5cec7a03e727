//! Object store key layout

use crate::models::MosaicSelector;
use crate::{Error, Result};

/// `mosaics/{site}/{sector}/{period}/{pad_id}/{variant}/viewer`
pub fn mosaic_viewer_prefix(mosaic: &MosaicSelector) -> String {
    format!(
        "mosaics/{}/{}/{}/{}/{}/viewer",
        mosaic.pad.site, mosaic.pad.sector, mosaic.pad.period, mosaic.pad.pad_id, mosaic.variant
    )
}

/// Camera-position feed for a pad and variant
pub fn shots_key(mosaic: &MosaicSelector) -> String {
    format!("{}/shots.geojson", mosaic_viewer_prefix(mosaic))
}

/// Orthomosaic GeoTIFF for a pad and variant
pub fn orthophoto_key(mosaic: &MosaicSelector) -> String {
    format!("{}/odm_orthophoto.tif", mosaic_viewer_prefix(mosaic))
}

/// Validate an object key
///
/// Keys are `/`-separated relative paths whose segments use only
/// `[A-Za-z0-9._-]`. Empty, `.` and `..` segments are rejected so a key can
/// never address anything outside the bucket root.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidInput("Empty object key".to_string()));
    }

    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(Error::InvalidInput(format!("Invalid object key: {}", key)));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(Error::InvalidInput(format!(
                "Invalid character in object key: {}",
                key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MosaicVariant, PadSelector};

    fn mosaic() -> MosaicSelector {
        MosaicSelector::new(
            PadSelector::new("leyte", "malitbog", "20250228-PMSB", "leyte_malitbog_PAD_msb"),
            MosaicVariant::Medical,
        )
    }

    #[test]
    fn test_layout() {
        assert_eq!(
            shots_key(&mosaic()),
            "mosaics/leyte/malitbog/20250228-PMSB/leyte_malitbog_PAD_msb/medical/viewer/shots.geojson"
        );
        assert!(orthophoto_key(&mosaic()).ends_with("/medical/viewer/odm_orthophoto.tif"));
        assert!(validate_key(&shots_key(&mosaic())).is_ok());
    }

    #[test]
    fn test_traversal_rejected() {
        for key in ["", "/etc/passwd", "a/../b", "a//b", "./a", "a/b/", "a b", "a\\b"] {
            assert!(validate_key(key).is_err(), "key {:?} should be rejected", key);
        }
    }
}
