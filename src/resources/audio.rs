//! Background audio thread and its channel bridge.
//!
//! Raylib `Sound` and `Music` handles borrow the audio device, so all of
//! them live on one dedicated thread that owns the `RaylibAudio` instance.
//! The rest of the library talks to it through crossbeam channels: commands
//! go in, load confirmations come back. Playback commands are fire-and-
//! forget; loads block the caller until the thread reports success or
//! failure so that load errors surface at the call site.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::FxHashMap;

use crate::error::MicroError;

/// Commands sent *to* the audio thread.
#[derive(Debug)]
pub enum AudioCmd {
    LoadSound { id: String, path: String },
    PlaySound { id: String, volume: f32 },
    LoadMusic { id: String, path: String },
    PlayMusic { id: String, volume: f32 },
    StopMusic,
    UnloadAll,
    Shutdown,
}

/// Replies sent *back* from the audio thread after a load command.
#[derive(Debug, Clone)]
pub enum AudioReply {
    Loaded { id: String },
    LoadFailed { id: String, error: String },
}

/// Channel endpoints owned by the main thread.
pub struct AudioBridge {
    tx_cmd: Sender<AudioCmd>,
    rx_reply: Receiver<AudioReply>,
    handle: Option<JoinHandle<()>>,
}

/// How long a blocking load waits for the audio thread before giving up.
const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

impl AudioBridge {
    /// Spawn the audio thread and connect the channels.
    ///
    /// Fails with [`MicroError::Init`] if the thread reports that the audio
    /// device could not be opened.
    pub fn start() -> Result<Self, MicroError> {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_reply, rx_reply) = unbounded::<AudioReply>();
        let (tx_ready, rx_ready) = unbounded::<Result<(), String>>();

        let handle = std::thread::Builder::new()
            .name("micro2d-audio".into())
            .spawn(move || audio_thread(rx_cmd, tx_reply, tx_ready))
            .map_err(|e| MicroError::Init(format!("could not spawn audio thread: {e}")))?;

        match rx_ready.recv_timeout(LOAD_TIMEOUT) {
            Ok(Ok(())) => Ok(AudioBridge {
                tx_cmd,
                rx_reply,
                handle: Some(handle),
            }),
            Ok(Err(error)) => Err(MicroError::Init(format!("audio device: {error}"))),
            Err(_) => Err(MicroError::Init("audio thread did not start".into())),
        }
    }

    /// Fire-and-forget command. Send errors after shutdown are ignored.
    pub fn send(&self, cmd: AudioCmd) {
        let _ = self.tx_cmd.send(cmd);
    }

    /// Send a load command and block until the thread confirms it.
    pub fn load_blocking(&self, cmd: AudioCmd, id: &str, path: &str) -> Result<(), MicroError> {
        self.send(cmd);
        loop {
            match self.rx_reply.recv_timeout(LOAD_TIMEOUT) {
                Ok(AudioReply::Loaded { id: done }) if done == id => return Ok(()),
                Ok(AudioReply::LoadFailed { id: done, error }) if done == id => {
                    return Err(MicroError::load(path, error));
                }
                // A stale reply for another id; keep waiting for ours.
                Ok(_) => continue,
                Err(_) => {
                    return Err(MicroError::load(path, "audio thread did not respond"));
                }
            }
        }
    }
}

impl Drop for AudioBridge {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(AudioCmd::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Owns the audio device and every loaded `Sound`/`Music` handle. Drains
/// commands without blocking, pumps the active music stream (restarting it
/// when it runs out, since music always loops), and sleeps briefly between
/// iterations. Exits on [`AudioCmd::Shutdown`].
fn audio_thread(
    rx_cmd: Receiver<AudioCmd>,
    tx_reply: Sender<AudioReply>,
    tx_ready: Sender<Result<(), String>>,
) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => {
            let _ = tx_ready.send(Ok(()));
            device
        }
        Err(e) => {
            let _ = tx_ready.send(Err(e.to_string()));
            return;
        }
    };
    log::debug!("audio thread running (id={:?})", std::thread::current().id());

    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut current_music: Option<String> = None;

    'run: loop {
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadSound { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        log::debug!("sound loaded id=`{id}` path=`{path}`");
                        sounds.insert(id.clone(), sound);
                        let _ = tx_reply.send(AudioReply::Loaded { id });
                    }
                    Err(e) => {
                        log::warn!("sound load failed id=`{id}` path=`{path}`: {e}");
                        let _ = tx_reply.send(AudioReply::LoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlaySound { id, volume } => {
                    if let Some(sound) = sounds.get(&id) {
                        sound.set_volume(volume);
                        sound.play();
                    }
                }
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        log::debug!("music loaded id=`{id}` path=`{path}`");
                        musics.insert(id.clone(), music);
                        let _ = tx_reply.send(AudioReply::Loaded { id });
                    }
                    Err(e) => {
                        log::warn!("music load failed id=`{id}` path=`{path}`: {e}");
                        let _ = tx_reply.send(AudioReply::LoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayMusic { id, volume } => {
                    if let Some(previous) = current_music.take()
                        && previous != id
                        && let Some(music) = musics.get(&previous)
                    {
                        music.stop_stream();
                    }
                    if let Some(music) = musics.get(&id) {
                        log::debug!("music start id=`{id}`");
                        music.set_volume(volume);
                        music.seek_stream(0.0);
                        music.play_stream();
                        current_music = Some(id);
                    }
                }
                AudioCmd::StopMusic => {
                    if let Some(id) = current_music.take()
                        && let Some(music) = musics.get(&id)
                    {
                        log::debug!("music stop id=`{id}`");
                        music.stop_stream();
                    }
                }
                AudioCmd::UnloadAll => {
                    log::debug!("unloading all audio");
                    current_music = None;
                    sounds.clear();
                    musics.clear();
                }
                AudioCmd::Shutdown => break 'run,
            }
        }

        // Music streams need regular pumping, and the active track restarts
        // from the top when it runs out.
        if let Some(id) = current_music.as_deref()
            && let Some(music) = musics.get(id)
        {
            if music.is_stream_playing() {
                music.update_stream();
            } else {
                music.seek_stream(0.0);
                music.play_stream();
            }
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    log::debug!("audio thread exiting");
    // Sound and Music handles drop before `audio`.
}
