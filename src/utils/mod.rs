/// Check if the current environment has the required external tools
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available("yt-dlp").await {
        missing.push("yt-dlp - required for downloading video audio".to_string());
    }

    if !check_command_available("whisper-cli").await {
        missing.push("whisper-cli - required for transcription".to_string());
    }

    if !check_command_available("ffmpeg").await {
        missing.push("ffmpeg - required by yt-dlp for audio extraction".to_string());
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_command_is_reported_unavailable() {
        assert!(!check_command_available("definitely-not-a-real-command-xyz").await);
    }
}
