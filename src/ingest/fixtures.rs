/// Test fixtures: representative CSV snapshot payloads from the INPE
/// queimadas archive.
///
/// These reflect the real column layouts published over the years:
///   daily files:     datahora, satelite, ... , lat, lon, bioma, frp
///   10-minute files: data_hora_gmt, latitude, longitude, ... , frp
///
/// Older files are Latin-1 encoded; `fixture_latin1_bytes` reproduces one.
/// FRP values are chosen around the 75 MW default threshold so classifier
/// tests can exercise every tier.

/// Daily snapshot, UTF-8, canonical header spelling. Three detections:
/// high FRP in Amazônia, moderate FRP in Cerrado, no FRP in Caatinga.
#[cfg(test)]
pub(crate) fn fixture_daily_utf8() -> &'static str {
    "datahora,satelite,municipio,estado,bioma,lat,lon,frp\n\
     2024-08-15 12:30:00,AQUA_M-T,MANAUS,AMAZONAS,Amazônia,-3.1025,-60.0217,84.3\n\
     2024-08-15 12:30:00,AQUA_M-T,FORMOSA,GOIÁS,Cerrado,-15.5372,-47.3361,41.0\n\
     2024-08-15 13:00:00,NOAA-20,JUAZEIRO,BAHIA,Caatinga,-9.4306,-40.5028,\n"
}

/// 10-minute snapshot using the alternate header spellings
/// (data_hora_gmt / latitude / longitude) and no biome column.
#[cfg(test)]
pub(crate) fn fixture_slot_alias_headers() -> &'static str {
    "data_hora_gmt,satelite,latitude,longitude,frp\n\
     2024-08-15 14:20:00,GOES-16,-9.4501,-56.1012,120.5\n\
     2024-08-15 14:20:00,GOES-16,-10.2210,-55.9870,12.7\n"
}

/// Latin-1 encoded daily row. "Amazônia" and "São Félix do Xingu" carry
/// bytes 0xF4, 0xE3, 0xE9 which are invalid as UTF-8, forcing the
/// loader's fallback decode.
#[cfg(test)]
pub(crate) fn fixture_latin1_bytes() -> Vec<u8> {
    b"datahora,municipio,estado,bioma,lat,lon,frp\n\
2024-08-15 12:30:00,S\xE3o F\xE9lix do Xingu,PAR\xC1,Amaz\xF4nia,-6.6447,-51.9950,95.0\n"
        .to_vec()
}

/// Rows with malformed or out-of-range values. The loader must retain all
/// three rows and null only the offending fields.
#[cfg(test)]
pub(crate) fn fixture_bad_values() -> &'static str {
    "datahora,lat,lon,bioma,frp\n\
     2024-08-15 12:30:00,not-a-lat,not-a-lon,Cerrado,30.0\n\
     2024-08-15 12:40:00,999.0,-361.5,Cerrado,30.0\n\
     bad-timestamp,-15.5372,-47.3361,Cerrado,n/d\n"
}

/// Header row only - a slot that was published but recorded no detections.
/// Must be treated as "no data", equivalent to the file being absent.
#[cfg(test)]
pub(crate) fn fixture_header_only() -> &'static str {
    "data_hora_gmt,satelite,latitude,longitude,frp\n"
}
