#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    sherpa_onnx_stt_lib::run()
}
