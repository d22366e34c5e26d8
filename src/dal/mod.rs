pub mod input_sheet;
pub mod report_file;
pub mod work_item_file;
