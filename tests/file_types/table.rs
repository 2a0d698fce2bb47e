//! record table support test

use std::fs;

use cvn_rs::prelude::file::xor;
use cvn_rs::prelude::*;

use super::scratch_dir;

#[test_log::test]
fn test_table_file_roundtrip() {
	let dir = scratch_dir("table-roundtrip");
	let path = dir.join("item.cv1");
	let source = "# id,name,price\r\n1,Potion,50\r\n\r\n2,\"Ether, large\",300\r\n";
	fs::write(&path, xor::apply(source.as_bytes())).unwrap();

	let mut table = TableFile::open(&path).unwrap();
	assert_eq!(table.len(), 2);
	assert_eq!(table.records()[0], Record::from(["1", "Potion", "50"]));
	assert_eq!(table.get(1).and_then(|record| record.get(1)), Some("Ether, large"));

	let csv = dir.join("item.csv");
	table.extract(&csv).unwrap();
	assert_eq!(
		fs::read_to_string(&csv).unwrap(),
		"1,Potion,50\r\n2,\"Ether, large\",300\r\n"
	);

	let saved = dir.join("saved.cv1");
	table.save(&saved).unwrap();
	let reopened = TableFile::open(&saved).unwrap();
	assert_eq!(reopened.records(), table.records());
}

#[test_log::test]
fn test_table_edit_and_save() {
	let dir = scratch_dir("table-edit");
	let path = dir.join("edit.cv1");

	let mut table = TableFile::new();
	table.set_records(vec![Record::from(["a", "b"]), Record::from(["c, d"])]);
	table.save(&path).unwrap();

	let mut reopened = TableFile::open(&path).unwrap();
	assert_eq!(reopened.len(), 2);
	assert_eq!(reopened.get(1).and_then(|record| record.get(0)), Some("c, d"));

	let mut records = reopened.records().to_vec();
	records.push(Record::from(["e"]));
	reopened.set_data(records).unwrap();
	assert_eq!(reopened.raw_text(), "a,b\r\n\"c, d\"\r\ne\r\n");
}
