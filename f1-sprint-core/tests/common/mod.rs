#![allow(dead_code)]

use std::path::Path;

use f1_sprint_core::table::{read_table, RawTable};

pub fn table(name: &str, csv: &str) -> RawTable {
    read_table(name, csv.as_bytes()).expect("fixture csv should parse")
}

pub fn write_dataset(dir: &Path, sprint_results: &str, drivers: &str, races: &str) {
    std::fs::write(dir.join("sprint_results.csv"), sprint_results).unwrap();
    std::fs::write(dir.join("drivers.csv"), drivers).unwrap();
    std::fs::write(dir.join("races.csv"), races).unwrap();
}

pub const SPRINT_RESULTS: &str = "\
resultId,raceId,driverId,number,grid,position,positionText,positionOrder,points
1,1061,830,33,2,1,1,1,3
2,1061,1,44,1,2,2,2,2
3,1065,830,33,1,1,1,1,3
4,1065,822,77,3,2,2,2,2
5,1071,822,77,5,1,1,1,3
6,1071,815,11,8,\\N,R,20,0
7,1077,815,11,1,1,1,1,8
8,1077,830,1,2,2,2,2,7
";

pub const DRIVERS: &str = "\
driverId,driverRef,number,code,forename,surname,dob,nationality
1,hamilton,44,HAM,Lewis,Hamilton,1985-01-07,British
815,perez,11,PER,Sergio,Pérez,1990-01-26,Mexican
822,bottas,77,BOT, Valtteri ,Bottas ,1989-08-28,Finnish
830,max_verstappen,33,VER,Max,Verstappen,1997-09-30,Dutch
";

pub const RACES: &str = "\
raceId,year,round,circuitId,name,date,time,sprint_date
1061,2021,10,9,British Grand Prix,2021-07-18,14:00:00,2021-07-17
1065,2021,14,14,Italian Grand Prix,2021-09-12,13:00:00,2021-09-11
1071,2021,19,18,São Paulo Grand Prix,2021-11-14,17:00:00,2021-11-13
1077,2022,4,21,Emilia Romagna Grand Prix,2022-04-24,13:00:00,2022-04-23
";
