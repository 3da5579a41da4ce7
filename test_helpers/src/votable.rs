//! VOTable documents shaped like the filter catalog's responses

/// Ten samples of a Johnson V-like bandpass, wavelength in Angstrom
pub fn johnson_v_samples() -> Vec<(f64, f64)> {
    vec![
        (3000.0, 0.0),
        (4700.0, 0.02),
        (5000.0, 0.43),
        (5300.0, 0.92),
        (5500.0, 0.95),
        (5800.0, 0.74),
        (6200.0, 0.35),
        (6600.0, 0.12),
        (7400.0, 0.01),
        (9000.0, 0.0),
    ]
}

/// A successful catalog response carrying `samples` as the transmission table
pub fn filter_votable(samples: &[(f64, f64)]) -> String {
    let rows: String = samples
        .iter()
        .map(|(w, t)| format!("    <TR><TD>{w:.1}</TD><TD>{t}</TD></TR>\n"))
        .collect();
    wrap_table("OK", &rows)
}

/// A document holding exactly these cells, in one row, regardless of pairing
pub fn votable_from_cells(cells: &[&str]) -> String {
    let tds: String = cells.iter().map(|c| format!("<TD>{c}</TD>")).collect();
    wrap_table("OK", &format!("    <TR>{tds}</TR>\n"))
}

/// The catalog's answer for an unknown filter ID
pub fn error_votable(key: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<VOTABLE version="1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <INFO name="QUERY_STATUS" value="ERROR">ERROR: Filter ID {key} not found</INFO>
</VOTABLE>
"#
    )
}

fn wrap_table(status: &str, rows: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<VOTABLE version="1.1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <INFO name="QUERY_STATUS" value="{status}"/>
  <RESOURCE type="results">
  <TABLE utype="photdm:PhotometryFilter.transmissionCurve.spectrum">
    <PARAM name="WavelengthUnit" value="Angstrom" datatype="char" arraysize="*"/>
    <FIELD name="Wavelength" ucd="em.wl" unit="Angstrom" datatype="double"/>
    <FIELD name="Transmission" ucd="phys.transmission" datatype="double"/>
    <DATA><TABLEDATA>
{rows}    </TABLEDATA></DATA>
  </TABLE>
  </RESOURCE>
</VOTABLE>
"#
    )
}
