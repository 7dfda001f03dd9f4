//! Deduplicacion single-flight de trabajo identico concurrente.
//!
//! El primer caller de una key es el lider y ejecuta el trabajo; los que
//! llegan mientras corre se suscriben a un canal `watch` y reciben el
//! resultado del lider, errores incluidos. `watch` guarda el ultimo valor,
//! asi que un follower que se suscribe tarde igual ve el resultado.
//!
//! Si el lider se cancela antes de publicar (el cliente HTTP se fue), su
//! entrada se elimina y el sender se descarta; los followers ven el canal
//! cerrado y vuelven a elegir lider.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

type Slot<T, E> = Arc<watch::Sender<Option<Result<T, E>>>>;

/// Como obtuvo un caller su resultado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Ejecuto el trabajo.
    Leader,
    /// Recibio el resultado del trabajo de otro caller.
    Follower,
}

/// Deduplica computaciones concurrentes por key `K`.
pub struct SingleFlight<K, T, E> {
    calls: Mutex<HashMap<K, Slot<T, E>>>,
}

impl<K, T, E> Default for SingleFlight<K, T, E> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, T, E> SingleFlight<K, T, E>
where
    K: Hash + Eq + Clone,
    T: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Ejecuta `work` salvo que haya una llamada identica en curso; en ese
    /// caso espera su resultado.
    pub async fn run<F, Fut>(&self, key: K, work: F) -> (Result<T, E>, Role)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = loop {
            let rx = {
                let mut calls = self.calls.lock();
                match calls.get(&key) {
                    Some(slot) => slot.subscribe(),
                    None => {
                        let (tx, _) = watch::channel(None);
                        let slot = Arc::new(tx);
                        calls.insert(key.clone(), Arc::clone(&slot));
                        break slot;
                    },
                }
            };

            if let Some(result) = wait_for_result(rx).await {
                return (result, Role::Follower);
            }
            // El lider desaparecio sin publicar; intentar tomar su lugar
        };

        let _guard = LeaderGuard {
            calls: &self.calls,
            key: &key,
            slot: &slot,
        };

        let result = work().await;
        slot.send_replace(Some(result.clone()));

        (result, Role::Leader)
    }

    /// Retorna el numero de keys con trabajo en curso.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

async fn wait_for_result<T: Clone, E: Clone>(
    mut rx: watch::Receiver<Option<Result<T, E>>>,
) -> Option<Result<T, E>> {
    let published = rx.wait_for(Option::is_some).await.ok()?;
    (*published).clone()
}

/// Elimina la entrada del lider cuando termina o se descarta.
struct LeaderGuard<'a, K: Hash + Eq, T, E> {
    calls: &'a Mutex<HashMap<K, Slot<T, E>>>,
    key: &'a K,
    slot: &'a Slot<T, E>,
}

impl<K: Hash + Eq, T, E> Drop for LeaderGuard<'_, K, T, E> {
    fn drop(&mut self) {
        let mut calls = self.calls.lock();
        // Solo borrar nuestro slot, nunca el de un sucesor
        if calls
            .get(self.key)
            .is_some_and(|current| Arc::ptr_eq(current, self.slot))
        {
            calls.remove(self.key);
        }
    }
}
