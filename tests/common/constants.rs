//! Expected figures for the fixture titles CSV.

#![allow(dead_code)]

pub const TITLES_FILE: &str = "Netflix Datasets Evaluation MS Excel.csv";

/// Header plus eight rows; `s1` appears twice.
pub const TITLES_CSV: &str = "\
show_id,type,title,director,country,date_added,release_year,rating,duration,listed_in
s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries
s2,TV Show,Blood & Water,,South Africa,\"September 24, 2021\",2021,TV-MA,2 Seasons,\"International TV Shows, TV Dramas\"
s3,TV Show,Ganglands,Julien Leclercq,,\"September 24, 2021\",2021,TV-MA,1 Season,Crime TV Shows
s4,Movie,Sankofa,Haile Gerima,\"United States, Ghana, Burkina Faso\",\"September 24, 2021\",1993,TV-MA,125 min,Dramas
s5,Movie,The Starling,Theodore Melfi,United States,\"September 24, 2021\",2021,PG-13,104 min,\"Comedies, Dramas\"
s1,Movie,Dick Johnson Is Dead (again),Kirsten Johnson,Canada,\"September 25, 2021\",2019,PG-13,95 min,Documentaries
s6,Movie,Jeans,Shankar,India,\"September 21, 2021\",1998,TV-14,166 min,Comedies
s7,TV Show,Kota Factory,,India,\"September 24, 2021\",2021,TV-MA,,International TV Shows
";

pub const RAW_ROW_COUNT: usize = 8;
pub const TITLE_COUNT: usize = 7;
pub const MOVIE_COUNT: usize = 4;
pub const SHOW_COUNT: usize = 3;

/// Minutes of every title with a duration: 90, 900, 450, 125, 104, 166.
pub const MEAN_DURATION_MINUTES: f64 = 1835.0 / 6.0;

pub const KINDS: [&str; 2] = ["Movie", "TV Show"];
pub const YEARS: [i32; 4] = [1993, 1998, 2020, 2021];
pub const COUNTRIES: [&str; 3] = ["India", "South Africa", "United States"];

pub const ARTISTS_FILE: &str = "artists.csv";
pub const ARTISTS_CSV: &str = "\
id,name,followers
a1,Mina,120000
a2,Lucio Dalla,
";
