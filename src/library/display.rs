/// Build a track's display name from its file name by stripping the last
/// extension (`"song.live.mp3"` becomes `"song.live"`).
///
/// A name that would end up empty (`".ogg"`) or that has nothing after its
/// last dot (`"song."`) is kept as is.
pub fn display_name_for(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file_name.len() => file_name[..dot].to_string(),
        _ => file_name.to_string(),
    }
}
