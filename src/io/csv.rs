/*!
# Saving Sample Streams to CSV

Writes the recorded streams of a run to a CSV file so they can be inspected or
re-analyzed elsewhere. Enable via the `csv` feature.
*/

use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::error::BinningError;
use crate::series::FrozenSeries;

/**
Saves equally long series as columns of a CSV file.

The header row is `"step"` followed by the name of each series. Each following
row holds the step index and the sample of every series at that step. Unnamed
series get the column name `"series_<i>"`.

# Examples

```rust
use binning_analysis::io::csv::save_csv;
use binning_analysis::series::FrozenSeries;

let a = FrozenSeries::from(vec![1.0, 2.0]);
let b = FrozenSeries::from(vec![0.5, 0.25]);
save_csv(&[&a, &b], "/tmp/streams.csv").expect("Expecting saving data to succeed");
```
*/
pub fn save_csv<P: AsRef<Path>>(series: &[&FrozenSeries], filename: P) -> Result<(), BinningError> {
    let rows = series.iter().map(|s| s.len()).min().unwrap_or(0);
    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut header = vec!["step".to_string()];
    header.extend(series.iter().enumerate().map(|(i, s)| {
        if s.name().is_empty() {
            format!("series_{i}")
        } else {
            s.name().to_string()
        }
    }));
    wtr.write_record(&header)?;

    for step in 0..rows {
        let mut row = vec![step.to_string()];
        row.extend(series.iter().map(|s| s[step].to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
