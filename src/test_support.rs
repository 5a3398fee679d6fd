//! Small three-country dataset shared by the unit tests.
//!
//! Benin has one missing GHI value (its group mean is 200), Sierra Leone one missing DNI
//! value and no Tamb values at all, Togo is complete. Only Benin reports wind gusts.

use crate::error::SolarError;
use crate::frames::canonical_frame::CanonicalFrame;
use crate::loading::options::LoadOptions;
use crate::types::source_input::SourceInput;
use crate::load_sources;

pub(crate) const BENIN_CSV: &str = "\
Timestamp,GHI,DNI,DHI,ModA,ModB,Tamb,RH,WS,WSgust,BP,Comments
2021-08-09 00:00,100,50,20,90,88,25,80,1.0,2.0,998,
2021-08-20 12:00,,60,30,95,93,27,75,2.0,3.0,997,
2021-09-02 12:00,300,70,40,280,275,29,70,3.0,4.0,996,
";

pub(crate) const SIERRA_LEONE_CSV: &str = "\
Timestamp,GHI,DNI,DHI,ModA,ModB,Tamb,RH,WS,BP
2021-10-01 06:00,40,,12,38,37,,90,0.8,1001
2021-10-02 06:00,60,25,18,58,57,,88,1.2,1000
";

pub(crate) const TOGO_CSV: &str = "\
Timestamp,GHI,DNI,DHI,ModA,ModB,Tamb,RH,WS,BP
2021-10-25 00:00,10,5,2,9,8,24,85,0.5,999
2021-10-26 00:00,20,15,4,19,18,26,83,1.5,998
";

pub(crate) fn sample_inputs() -> Vec<SourceInput> {
    vec![
        SourceInput::from_bytes("Benin", BENIN_CSV),
        SourceInput::from_bytes("Sierra Leone", SIERRA_LEONE_CSV),
        SourceInput::from_bytes("Togo", TOGO_CSV),
    ]
}

pub(crate) fn canonical() -> Result<CanonicalFrame, SolarError> {
    load_sources(&sample_inputs(), &LoadOptions::default())
}
