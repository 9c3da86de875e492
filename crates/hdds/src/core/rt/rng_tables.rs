// Syllable tables for `Mt19937::random_name`. 64 pregrams, 128 bigrams,
// 1024 trigrams — chosen so each table is indexable by a fixed bit-slice of
// one 32-bit draw (6 + 7 + 7 + 10 bits).

const PREGRAMS: [&str; 64] = [
    "tre", "tru", "tri", "tro", "tra", "ste", "stu", "sti",
    "sto", "sta", "sre", "sru", "sri", "sro", "sra", "pre",
    "pru", "pri", "pro", "pra", "ple", "plu", "pli", "plo",
    "pla", "sle", "slu", "sli", "slo", "sla", "kre", "kru",
    "kri", "kro", "kra", "kle", "klu", "kli", "klo", "kla",
    "kne", "knu", "kni", "kno", "kna", "dre", "dru", "dri",
    "dro", "che", "chu", "chi", "cho", "cha", "fre", "fru",
    "fri", "fro", "fra", "fle", "flu", "fli", "flo", "fla",
];

const BIGRAMS: [&str; 128] = [
    "wu", "wi", "wa", "weu", "wau", "woe", "wei", "woi",
    "re", "ru", "ri", "ro", "ra", "rau", "roe", "roi",
    "te", "tu", "ti", "ta", "tau", "toi", "tai", "pe",
    "pu", "pi", "peu", "pau", "poe", "poi", "pai", "se",
    "su", "si", "so", "sa", "seu", "sau", "soe", "sei",
    "soi", "sai", "de", "di", "do", "da", "deu", "doe",
    "doi", "dai", "fe", "fi", "fo", "feu", "fau", "foe",
    "fei", "foi", "ge", "gu", "geu", "gau", "goe", "gei",
    "goi", "gai", "ke", "ki", "ko", "ka", "keu", "kei",
    "koi", "le", "lu", "li", "lo", "la", "leu", "loe",
    "lai", "zi", "zo", "za", "zeu", "zau", "zoe", "zei",
    "zoi", "zai", "ce", "cu", "ci", "co", "ca", "ceu",
    "coi", "cai", "vi", "vo", "va", "veu", "vei", "vai",
    "be", "bu", "bi", "bo", "ba", "beu", "boe", "bei",
    "bai", "ne", "nu", "ni", "no", "neu", "nau", "noe",
    "nei", "me", "mu", "mo", "ma", "meu", "mei", "mai",
];

const TRIGRAMS: [&str; 1024] = [
    "wer", "wet", "wes", "wed", "weg", "wel", "wez", "wec",
    "wev", "web", "wen", "wem", "wuw", "wur", "wut", "wup",
    "wus", "wud", "wug", "wuk", "wuz", "wuv", "wub", "wun",
    "wum", "wiw", "wit", "wid", "wif", "wig", "wik", "wil",
    "wiz", "wic", "wiv", "win", "wim", "wot", "wop", "wos",
    "wod", "wof", "wol", "woz", "woc", "wov", "wob", "won",
    "wom", "waw", "war", "wat", "was", "wad", "waf", "wag",
    "wal", "waz", "wac", "wav", "wan", "wam", "rer", "ret",
    "rep", "res", "red", "ref", "rek", "rel", "rez", "rec",
    "reb", "ren", "ruw", "rur", "rut", "rup", "rus", "rud",
    "ruf", "rug", "ruz", "ruc", "run", "riw", "rir", "rit",
    "rip", "ris", "rid", "rif", "rik", "ril", "riz", "ric",
    "riv", "rib", "rin", "row", "ror", "rop", "ros", "rof",
    "rok", "rol", "roz", "roc", "rov", "rob", "rom", "raw",
    "rar", "rat", "rap", "ras", "rad", "rag", "rak", "ral",
    "rac", "rav", "ran", "ram", "ter", "tet", "tep", "ted",
    "tef", "teg", "tel", "tez", "tec", "tev", "ten", "tem",
    "tuw", "tur", "tut", "tup", "tus", "tud", "tuf", "tuk",
    "tul", "tuv", "tun", "tum", "tir", "tip", "tis", "tid",
    "tif", "tig", "tik", "til", "tic", "tiv", "tib", "tin",
    "tor", "tot", "top", "tos", "tod", "tof", "tog", "tok",
    "tol", "toc", "tov", "tob", "ton", "tom", "taw", "tar",
    "tap", "tas", "taf", "tag", "tak", "taz", "tac", "tav",
    "tab", "tan", "tam", "pew", "per", "pet", "pep", "pes",
    "ped", "pek", "pel", "pez", "pec", "peb", "pem", "puw",
    "put", "pus", "pud", "puf", "pug", "puk", "puz", "puc",
    "puv", "pub", "pun", "pum", "piw", "pir", "pid", "pif",
    "pig", "pil", "piz", "pic", "piv", "pib", "pin", "pim",
    "pow", "por", "pot", "pop", "pod", "pof", "pok", "poz",
    "poc", "pob", "pon", "pom", "paw", "par", "pat", "pap",
    "pas", "pad", "paf", "pag", "pak", "pal", "pac", "pav",
    "pan", "sew", "set", "ses", "sed", "sef", "seg", "sek",
    "sel", "sez", "sec", "sev", "seb", "sen", "sem", "suw",
    "sur", "sut", "sup", "sud", "suf", "sug", "suk", "sul",
    "suz", "suc", "suv", "sub", "sun", "sum", "siw", "sir",
    "sit", "sip", "sid", "sig", "sik", "sil", "siz", "sic",
    "sib", "sin", "sow", "sor", "sot", "sop", "sos", "sof",
    "sog", "sok", "sol", "soc", "sob", "son", "saw", "sar",
    "sat", "sas", "sad", "sag", "sak", "sav", "sab", "san",
    "dew", "der", "det", "dep", "des", "ded", "deg", "del",
    "dec", "dev", "den", "dem", "dur", "dut", "dup", "dus",
    "dud", "dug", "duk", "dul", "duz", "duc", "duv", "dub",
    "dun", "dum", "diw", "dir", "dit", "dis", "did", "dif",
    "dig", "dik", "dil", "diz", "dic", "div", "dib", "din",
    "dim", "dow", "dor", "dot", "dop", "dos", "dod", "dok",
    "dol", "dob", "daw", "dar", "dat", "dap", "das", "daf",
    "dag", "dak", "daz", "dac", "dab", "few", "fer", "fet",
    "fep", "fes", "fed", "fef", "feg", "fek", "fel", "fec",
    "fev", "feb", "fen", "fem", "fuw", "fur", "fup", "fus",
    "fud", "ful", "fuv", "fub", "fun", "fum", "fiw", "fir",
    "fit", "fip", "fis", "fid", "fif", "fig", "fik", "fil",
    "fiz", "fic", "fiv", "fin", "fim", "fow", "for", "fop",
    "fod", "fof", "fog", "foz", "foc", "fov", "fon", "fom",
    "faw", "far", "fat", "fap", "fas", "fad", "fal", "faz",
    "fac", "fav", "fab", "fan", "fam", "gew", "ger", "get",
    "gep", "ges", "ged", "gef", "geg", "gek", "gel", "gec",
    "gev", "geb", "gen", "guw", "gur", "gut", "gup", "gus",
    "gud", "guf", "gug", "gul", "guz", "guc", "gun", "git",
    "gip", "gis", "gid", "gif", "gig", "gik", "gil", "giv",
    "gib", "gin", "gim", "gor", "got", "gop", "god", "gof",
    "gog", "gok", "gol", "goz", "goc", "gov", "gob", "gon",
    "gom", "gaw", "gar", "gat", "gap", "gas", "gaf", "gag",
    "gal", "gaz", "gac", "gav", "gab", "gan", "gam", "kew",
    "ker", "ket", "kep", "kes", "ked", "kef", "keg", "kek",
    "kez", "kec", "kev", "keb", "ken", "kem", "kuw", "kur",
    "kut", "kup", "kus", "kud", "kuf", "kul", "kuc", "kub",
    "kun", "kiw", "kir", "kit", "kip", "kis", "kid", "kif",
    "kig", "kik", "kil", "kiz", "kic", "kib", "kin", "kim",
    "kor", "kot", "kos", "kod", "kof", "kog", "kol", "koz",
    "kon", "kom", "kaw", "kap", "kas", "kad", "kag", "kak",
    "kal", "kaz", "kac", "kav", "kab", "kan", "kam", "lew",
    "ler", "let", "lep", "led", "lef", "leg", "lek", "lel",
    "leb", "len", "luw", "lur", "lut", "lup", "lus", "lud",
    "lug", "luk", "lul", "luz", "luc", "luv", "lub", "lun",
    "liw", "lir", "lip", "lis", "lid", "lif", "lig", "lik",
    "liz", "lic", "liv", "lib", "lin", "lim", "low", "lor",
    "lot", "lop", "los", "lod", "log", "lol", "loz", "loc",
    "lov", "lob", "lon", "lom", "law", "lar", "lat", "lap",
    "las", "laf", "lak", "lal", "lac", "lav", "lab", "zew",
    "zer", "zet", "zep", "zes", "zef", "zeg", "zek", "zel",
    "zez", "zec", "zev", "zen", "zem", "zur", "zut", "zup",
    "zus", "zud", "zuf", "zug", "zuk", "zuz", "zuv", "zub",
    "zun", "zum", "ziw", "zir", "zis", "zid", "zif", "zig",
    "zik", "ziz", "zic", "ziv", "zib", "zin", "zim", "zow",
    "zor", "zot", "zop", "zod", "zof", "zog", "zok", "zol",
    "zoz", "zoc", "zob", "zon", "zom", "zaw", "zar", "zat",
    "zap", "zas", "zad", "zag", "zal", "zaz", "zac", "zav",
    "zab", "zan", "zam", "cew", "cer", "cet", "cep", "ces",
    "ced", "cef", "ceg", "cek", "cel", "cez", "cec", "cev",
    "cen", "cem", "cuw", "cur", "cut", "cup", "cus", "cud",
    "cug", "cul", "cuc", "cuv", "cub", "cun", "ciw", "cir",
    "cit", "cip", "cis", "cid", "cif", "cik", "cil", "ciz",
    "cic", "civ", "cib", "cin", "cim", "cow", "cot", "cop",
    "cod", "cog", "col", "cov", "cob", "con", "com", "caw",
    "car", "cat", "cas", "cad", "caf", "cag", "cal", "caz",
    "cac", "cav", "cab", "vew", "ver", "vet", "vep", "ves",
    "vef", "veg", "vek", "vel", "vez", "vec", "vev", "ven",
    "vem", "vuw", "vur", "vut", "vup", "vud", "vug", "vuk",
    "vuz", "vuc", "vuv", "vub", "vum", "vir", "vit", "vip",
    "vis", "vid", "vif", "vig", "vik", "vil", "viz", "viv",
    "vib", "vin", "vim", "vor", "vot", "vop", "vos", "vod",
    "vog", "vok", "vol", "voz", "voc", "von", "vaw", "var",
    "vat", "vap", "vas", "vad", "vaf", "vag", "vak", "val",
    "vaz", "vac", "vav", "vab", "van", "vam", "bew", "ber",
    "bet", "bep", "bes", "bed", "bef", "beg", "bek", "bel",
    "bez", "bec", "bev", "beb", "bem", "buw", "bur", "but",
    "bus", "buf", "buk", "bul", "buz", "bub", "bun", "bir",
    "bit", "bip", "bid", "bif", "bik", "bil", "biz", "bic",
    "biv", "bib", "bin", "bim", "bow", "bor", "bop", "bos",
    "bod", "bof", "bog", "bok", "bol", "boz", "boc", "bov",
    "bob", "bom", "baw", "bar", "bat", "bap", "bas", "bad",
    "baf", "bag", "bak", "bal", "baz", "bac", "bav", "bab",
    "bam", "new", "ner", "net", "nes", "nef", "neg", "nez",
    "nev", "neb", "nen", "nuw", "nur", "nut", "nup", "nus",
    "nuf", "nug", "nuk", "nul", "nuz", "nuc", "nuv", "nun",
    "num", "nir", "nip", "nis", "nid", "nif", "nik", "niz",
    "niv", "nib", "nin", "nim", "now", "nor", "not", "nop",
    "nos", "nod", "nof", "nok", "noz", "nov", "nom", "naw",
    "nar", "nat", "nap", "nas", "nad", "naf", "nag", "nak",
    "nal", "naz", "nac", "nab", "nan", "nam", "mew", "mer",
    "met", "mep", "mes", "med", "mef", "meg", "mek", "mel",
    "mez", "mec", "mev", "meb", "men", "mem", "mur", "mut",
    "mus", "muf", "mug", "muk", "mul", "muz", "muc", "muv",
    "mub", "mun", "mum", "miw", "mir", "mit", "mip", "mis",
    "mid", "mif", "mik", "mil", "miz", "mic", "miv", "mib",
    "mim", "mow", "mor", "mot", "mop", "mod", "mof", "mog",
    "mok", "mol", "moz", "moc", "mov", "mon", "mom", "maw",
    "mar", "map", "mad", "mag", "maz", "mac", "mav", "mab",
];
