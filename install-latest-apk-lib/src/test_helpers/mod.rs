pub mod mock_artifact_source;
pub mod mock_device_bridge;
