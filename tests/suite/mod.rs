mod annotations;
mod config_resolution;
