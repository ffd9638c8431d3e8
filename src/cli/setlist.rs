use tabled::Table;

use crate::{
    error, info,
    setlist::{self, SetlistSource},
    types::SetlistTableRow,
};

pub async fn setlist(url: String, use_proxies: bool) {
    let source = match setlist::from_config(use_proxies).await {
        Ok(source) => source,
        Err(e) => error!("Cannot set up setlist source: {}", e),
    };

    let event = match source.fetch_setlist(&url).await {
        Ok(event) => event,
        Err(e) => error!("Failed to fetch setlist: {}", e),
    };

    if event.setlist.is_empty() {
        info!("No songs listed for {} on {}", event.artist, event.date);
        return;
    }

    let rows: Vec<SetlistTableRow> = event
        .setlist
        .iter()
        .enumerate()
        .map(|(i, song)| SetlistTableRow {
            position: i + 1,
            song: song.clone(),
        })
        .collect();

    println!(
        "{artist}\n{date} - {location}\n{table}\n",
        artist = event.artist,
        date = event.date,
        location = event.location,
        table = Table::new(rows)
    );
}
